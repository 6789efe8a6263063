use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Reasons an identifier string fails to decode.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CidError {
    #[error("identifier is empty")]
    Empty,

    #[error("cid must start with 'b' multibase, found {0:?}")]
    MissingMultibase(char),

    #[error("invalid base32 payload")]
    InvalidBase32,

    #[error("unsupported cid version {0} (expect v1)")]
    UnsupportedVersion(u8),

    #[error("unsupported multihash 0x{code:02x} with length {len} (expect sha2-256 len 32)")]
    UnsupportedMultihash { code: u8, len: u8 },

    #[error("truncated cid: {len} bytes decoded")]
    Truncated { len: usize },

    #[error("{extra} unexpected bytes after digest")]
    TrailingBytes { extra: usize },

    #[error("identifier is not in canonical form")]
    NonCanonical,
}
