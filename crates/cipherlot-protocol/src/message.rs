use serde::{Deserialize, Serialize};

use cipherlot_types::{Cid, FeedEntry, Timestamp};

use crate::error::{ProtocolError, ProtocolResult};

/// Default upper bound on request bodies.
pub const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Body of `POST /feeds/{author}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendRequest {
    pub cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl AppendRequest {
    pub fn new(cid: &Cid, ts: Option<Timestamp>) -> Self {
        Self {
            cid: cid.to_string(),
            ts: ts.map(|t| t.as_secs()),
        }
    }

    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(body).map_err(|e| ProtocolError::MalformedBody(e.to_string()))
    }

    /// Resolve into a feed entry, stamping `now` when no time was given.
    pub fn into_entry(self, now: Timestamp) -> ProtocolResult<FeedEntry> {
        if self.cid.is_empty() {
            return Err(ProtocolError::MissingField("cid"));
        }
        let cid = Cid::parse(&self.cid)?;
        Ok(FeedEntry::new(cid, self.ts.map_or(now, Timestamp::new)))
    }
}

/// Query string of `GET /feeds/{author}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    pub since: Option<i64>,
}

impl FeedQuery {
    pub fn new(since: Option<Timestamp>) -> Self {
        Self {
            since: since.map(|t| t.as_secs()),
        }
    }

    /// Parse the raw `since` parameter. Absent or empty means no filter.
    pub fn from_param(since: Option<&str>) -> ProtocolResult<Self> {
        let since = match since.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| ProtocolError::InvalidSince(raw.to_string()))?,
            ),
        };
        Ok(Self { since })
    }

    pub fn since(&self) -> Option<Timestamp> {
        self.since.map(Timestamp::new)
    }
}

/// JSON error body returned with every non-2xx gateway response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlot_types::Digest;

    fn cid() -> Cid {
        Cid::raw(Digest::from_hash([4; 32]))
    }

    #[test]
    fn append_with_explicit_ts() {
        let body = format!(r#"{{"cid":"{}","ts":100}}"#, cid());
        let entry = AppendRequest::from_slice(body.as_bytes())
            .unwrap()
            .into_entry(Timestamp::new(999))
            .unwrap();
        assert_eq!(entry, FeedEntry::new(cid(), 100));
    }

    #[test]
    fn append_defaults_ts_to_now() {
        let body = format!(r#"{{"cid":"{}"}}"#, cid());
        let entry = AppendRequest::from_slice(body.as_bytes())
            .unwrap()
            .into_entry(Timestamp::new(999))
            .unwrap();
        assert_eq!(entry.ts, Timestamp::new(999));
    }

    #[test]
    fn append_rejects_bad_shapes() {
        assert!(matches!(
            AppendRequest::from_slice(b"not json"),
            Err(ProtocolError::MalformedBody(_))
        ));
        assert!(AppendRequest::from_slice(br#"{"ts":1}"#).is_err());
        assert!(AppendRequest::from_slice(br#"{"cid":"x","ts":"soon"}"#).is_err());
    }

    #[test]
    fn append_rejects_empty_or_invalid_cid() {
        let empty = AppendRequest::from_slice(br#"{"cid":""}"#).unwrap();
        assert!(matches!(
            empty.into_entry(Timestamp::zero()),
            Err(ProtocolError::MissingField("cid"))
        ));
        let invalid = AppendRequest::from_slice(br#"{"cid":"bnotacid"}"#).unwrap();
        assert!(matches!(
            invalid.into_entry(Timestamp::zero()),
            Err(ProtocolError::InvalidId(_))
        ));
    }

    #[test]
    fn append_request_serializes_without_null_ts() {
        let json = serde_json::to_string(&AppendRequest::new(&cid(), None)).unwrap();
        assert_eq!(json, format!(r#"{{"cid":"{}"}}"#, cid()));
    }

    #[test]
    fn feed_query_params() {
        assert_eq!(FeedQuery::from_param(None).unwrap().since(), None);
        assert_eq!(FeedQuery::from_param(Some("")).unwrap().since(), None);
        assert_eq!(
            FeedQuery::from_param(Some("100")).unwrap().since(),
            Some(Timestamp::new(100))
        );
        assert_eq!(
            FeedQuery::from_param(Some("-5")).unwrap().since(),
            Some(Timestamp::new(-5))
        );
        assert!(matches!(
            FeedQuery::from_param(Some("yesterday")),
            Err(ProtocolError::InvalidSince(_))
        ));
        assert!(FeedQuery::from_param(Some("1.5")).is_err());
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_string(&ErrorBody::new("digest mismatch")).unwrap();
        assert_eq!(json, r#"{"error":"digest mismatch"}"#);
    }
}
