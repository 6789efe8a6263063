use cipherlot_types::{Cid, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The node answered with a non-success status.
    #[error("{method} {url} returned {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    #[error("invalid node endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("digest mismatch for {id}: content hashes to {computed}")]
    DigestMismatch { id: Cid, computed: Cid },

    #[error("manifest {0} has no chunks")]
    EmptyManifest(Cid),

    #[error("hashing failed: {0}")]
    Hash(#[from] cipherlot_crypto::HasherError),

    #[error("invalid document: {0}")]
    Type(#[from] TypeError),

    #[error("protocol error: {0}")]
    Protocol(#[from] cipherlot_protocol::ProtocolError),

    #[error("store error: {0}")]
    Store(#[from] cipherlot_store::StoreError),

    #[error("feed error: {0}")]
    Feed(#[from] cipherlot_feed::FeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task failed: {0}")]
    Task(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
