use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;

use cipherlot_protocol::{
    endpoints, AppendRequest, FeedQuery, HealthResponse, StatusResponse, StorageCounts,
};
use cipherlot_store::ObjectStore;
use cipherlot_types::{Cid, FeedEntry, Timestamp};

use crate::error::ApiError;
use crate::state::AppState;

/// Run a blocking storage call on tokio's blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("storage task failed: {e}")))?
}

/// A path key must be a single non-empty segment.
fn single_segment<'a>(key: &'a str, what: &str) -> Result<&'a str, ApiError> {
    if key.is_empty() || key.contains('/') {
        return Err(ApiError::BadRequest(format!("missing {what}")));
    }
    Ok(key)
}

fn object_id(key: &str) -> Result<Cid, ApiError> {
    Ok(Cid::parse(single_segment(key, "cid")?)?)
}

async fn put_object(
    store: Arc<dyn ObjectStore>,
    key: &str,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = object_id(key)?;
    blocking(move || Ok(store.put(&id, &body)?)).await?;
    Ok(StatusCode::CREATED)
}

async fn get_object(store: Arc<dyn ObjectStore>, key: &str) -> Result<Response, ApiError> {
    let id = object_id(key)?;
    let content_type = store.kind().content_type();
    let found = blocking(move || Ok(store.get(&id)?)).await?;
    match found {
        Some(data) => Ok(([(header::CONTENT_TYPE, content_type)], data).into_response()),
        None => Err(ApiError::NotFound("not found".into())),
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok(Timestamp::now()))
}

/// Node introspection. Count failures are logged and reported as zero.
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let data_root = state.data_root.display().to_string();
    let hostname = state.hostname.clone();
    let uptime = state.uptime_secs();
    let storage = blocking(move || {
        let count = |what: &str, result: Result<usize, String>| {
            result.unwrap_or_else(|e| {
                tracing::warn!(what, error = %e, "status count failed");
                0
            })
        };
        Ok(StorageCounts {
            blobs: count("blobs", state.blobs.count().map_err(|e| e.to_string())),
            manifests: count("manifests", state.manifests.count().map_err(|e| e.to_string())),
            feeds: count("feeds", state.feeds.authors().map(|a| a.len()).map_err(|e| e.to_string())),
        })
    })
    .await?;
    Ok(Json(StatusResponse::new(hostname, uptime, data_root, storage)))
}

pub async fn put_blob(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    put_object(state.blobs, &key, body).await
}

pub async fn get_blob(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    get_object(state.blobs, &key).await
}

pub async fn put_manifest(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    put_object(state.manifests, &key, body).await
}

pub async fn get_manifest(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    get_object(state.manifests, &key).await
}

/// `POST /feeds/{author}` with `{"cid": ..., "ts": optional}`.
pub async fn append_feed(
    State(state): State<AppState>,
    Path(author): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    single_segment(&author, "author")?;
    let entry = AppendRequest::from_slice(&body)?.into_entry(Timestamp::now())?;
    blocking(move || Ok(state.feeds.append(&author, &entry)?)).await?;
    Ok(StatusCode::CREATED)
}

/// `GET /feeds/{author}[?since=<i64>]`.
pub async fn read_feed(
    State(state): State<AppState>,
    Path(author): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<FeedEntry>>, ApiError> {
    single_segment(&author, "author")?;
    let query = FeedQuery::from_param(params.get("since").map(String::as_str))?;
    let entries = blocking(move || Ok(state.feeds.read(&author, query.since())?)).await?;
    Ok(Json(entries))
}

/// Requests that match no route. Bare collection paths are missing a key.
pub async fn fallback_handler(uri: Uri) -> ApiError {
    let path = uri.path();
    let collection = [
        (endpoints::BLOBS, "cid"),
        (endpoints::MANIFESTS, "cid"),
        (endpoints::FEEDS, "author"),
    ]
    .into_iter()
    .find(|(prefix, _)| path.strip_prefix(prefix) == Some("/"));

    match collection {
        Some((_, what)) => ApiError::BadRequest(format!("missing {what}")),
        None => ApiError::NotFound(format!("no route for {path}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_rules() {
        assert_eq!(single_segment("abc", "cid").unwrap(), "abc");
        assert!(matches!(
            single_segment("", "cid"),
            Err(ApiError::BadRequest(msg)) if msg == "missing cid"
        ));
        assert!(single_segment("a/b", "author").is_err());
    }

    #[tokio::test]
    async fn fallback_distinguishes_bare_collections() {
        let missing = fallback_handler("/feeds/".parse().unwrap()).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let unknown = fallback_handler("/nothing".parse().unwrap()).await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }
}
