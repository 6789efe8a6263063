use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all node endpoints.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route("/healthz", get(handler::health_handler))
        .route("/status", get(handler::status_handler))
        .route(
            "/blobs/*key",
            get(handler::get_blob).put(handler::put_blob),
        )
        .route(
            "/manifests/*key",
            get(handler::get_manifest).put(handler::put_manifest),
        )
        .route(
            "/feeds/*author",
            get(handler::read_feed).post(handler::append_feed),
        )
        .fallback(handler::fallback_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
