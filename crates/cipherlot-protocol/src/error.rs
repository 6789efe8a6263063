use cipherlot_types::CidError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The body is not the expected JSON shape.
    #[error("invalid body: {0}")]
    MalformedBody(String),

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("bad cid: {0}")]
    InvalidId(#[from] CidError),

    #[error("invalid since: {0:?}")]
    InvalidSince(String),

    #[error("not a deep link: {0:?}")]
    InvalidDeepLink(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
