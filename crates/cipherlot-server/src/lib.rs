//! HTTP gateway for a Cipherlot node.
//!
//! Exposes the blob store, manifest store, and per-author feeds of one node
//! over HTTP. The gateway only checks request shape; integrity checks belong
//! to the stores, and their errors map to status codes in [`ApiError`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use router::build_router;
pub use server::CipherlotServer;
pub use state::AppState;
