/// Errors from feed log operations.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The author id cannot name a feed.
    #[error("invalid author {author:?}: {reason}")]
    InvalidAuthor { author: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed lock poisoned")]
    LockPoisoned,
}

impl FeedError {
    /// Whether the caller sent something unacceptable.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidAuthor { .. })
    }
}

/// Result alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
