use cipherlot_types::{Cid, CidError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is not a valid identifier.
    #[error("bad cid: {0}")]
    InvalidId(#[from] CidError),

    /// The payload does not hash to the identifier it was written under.
    #[error("digest mismatch for {id}: payload hashes to {computed}")]
    DigestMismatch { id: Cid, computed: Cid },

    /// A manifest payload is not a parseable document.
    #[error("invalid json: {0}")]
    InvalidDocument(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An in-memory lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether the caller sent something unacceptable, as opposed to the
    /// store failing to do its job.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::DigestMismatch { .. } | Self::InvalidDocument(_)
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
