use serde::{Deserialize, Serialize};

use crate::cid::Cid;
use crate::error::TypeError;
use crate::temporal::Timestamp;

/// One publication event: a manifest identifier and when it was published.
///
/// The same shape is used on the wire (`{"cid": ..., "ts": ...}`) and as one
/// line of an author's on-disk feed log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedEntry {
    pub cid: Cid,
    pub ts: Timestamp,
}

impl FeedEntry {
    pub fn new(cid: Cid, ts: impl Into<Timestamp>) -> Self {
        Self { cid, ts: ts.into() }
    }

    /// Encode as a single JSON line, without the trailing newline.
    pub fn to_line(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Parse one log line. Surrounding whitespace is ignored.
    pub fn from_line(line: &str) -> Result<Self, TypeError> {
        serde_json::from_str(line.trim()).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
