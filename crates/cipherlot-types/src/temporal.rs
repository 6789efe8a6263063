use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Unix timestamp in whole seconds.
///
/// Feed entries are ordered by this value and subscribers track their
/// progress (the watermark) with it. Serializes as a bare integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// The UNIX epoch.
    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Returns `true` if this timestamp is strictly after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// RFC 3339 UTC rendering, e.g. `2024-05-01T12:00:00Z`.
    ///
    /// Returns `None` for values chrono cannot represent.
    pub fn to_rfc3339(&self) -> Option<String> {
        DateTime::from_timestamp(self.0, 0).map(rfc3339)
    }
}

/// Seconds-precision RFC 3339 rendering with a `Z` suffix.
pub fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
