use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cid::Cid;
use crate::error::TypeError;
use crate::temporal::rfc3339;

/// Schema version written into new manifests.
pub const MANIFEST_VERSION: u32 = 0;

/// Media type recorded for opaque payloads.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Encryption descriptor placeholder. Nothing interprets it yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionDescriptor {
    pub algo: String,
}

impl EncryptionDescriptor {
    pub fn none() -> Self {
        Self {
            algo: "none".into(),
        }
    }
}

impl Default for EncryptionDescriptor {
    fn default() -> Self {
        Self::none()
    }
}

/// Metadata document describing one published payload.
///
/// A manifest is stored by the identifier of its exact serialized bytes, so
/// field order matters: fields are declared in lexicographic order, which is
/// the layout every Cipherlot client has produced. Every field has a default
/// so consumers can read manifests written by other tools.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Publishing author id.
    pub author: String,
    /// Capability list placeholder.
    pub caps: Option<Vec<String>>,
    /// Blob identifiers making up the payload, in order.
    pub chunks: Vec<Cid>,
    /// RFC 3339 creation time.
    pub created: String,
    pub enc: EncryptionDescriptor,
    pub mime: String,
    /// Signature placeholder.
    pub sig: Option<String>,
    pub v: u32,
}

impl Manifest {
    /// A single-payload manifest as the publisher writes it.
    pub fn new(author: impl Into<String>, chunks: Vec<Cid>, created: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            caps: None,
            chunks,
            created: rfc3339(created),
            enc: EncryptionDescriptor::none(),
            mime: OCTET_STREAM.into(),
            sig: None,
            v: MANIFEST_VERSION,
        }
    }

    /// The first payload chunk, if any.
    pub fn first_chunk(&self) -> Option<&Cid> {
        self.chunks.first()
    }

    /// Serialize to the compact JSON bytes that get content-addressed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Parse a manifest document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            author: String::new(),
            caps: None,
            chunks: Vec::new(),
            created: String::new(),
            enc: EncryptionDescriptor::none(),
            mime: String::new(),
            sig: None,
            v: MANIFEST_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;
    use chrono::TimeZone;

    fn chunk(seed: u8) -> Cid {
        Cid::raw(Digest::from_hash([seed; 32]))
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn serialized_layout() {
        let manifest = Manifest::new("bob", vec![chunk(0)], created());
        let json = String::from_utf8(manifest.to_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            format!(
                "{{\"author\":\"bob\",\"caps\":null,\"chunks\":[\"{}\"],\
                 \"created\":\"2024-05-01T12:00:00Z\",\"enc\":{{\"algo\":\"none\"}},\
                 \"mime\":\"application/octet-stream\",\"sig\":null,\"v\":0}}",
                chunk(0)
            )
        );
    }

    #[test]
    fn parse_roundtrip() {
        let manifest = Manifest::new("alice", vec![chunk(1), chunk(2)], created());
        let parsed = Manifest::from_slice(&manifest.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.first_chunk(), Some(&chunk(1)));
    }

    #[test]
    fn parse_tolerates_missing_fields() {
        let parsed = Manifest::from_slice(br#"{"chunks":[]}"#).unwrap();
        assert!(parsed.chunks.is_empty());
        assert!(parsed.first_chunk().is_none());
        assert_eq!(parsed.created, "");
        assert_eq!(parsed.enc.algo, "none");
    }

    #[test]
    fn parse_tolerates_unknown_fields() {
        let json = format!(r#"{{"chunks":["{}"],"extra":true}}"#, chunk(3));
        let parsed = Manifest::from_slice(json.as_bytes()).unwrap();
        assert_eq!(parsed.first_chunk(), Some(&chunk(3)));
    }

    #[test]
    fn parse_rejects_bad_chunk_identifier() {
        assert!(Manifest::from_slice(br#"{"chunks":["not-a-cid"]}"#).is_err());
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(matches!(
            Manifest::from_slice(b"nope"),
            Err(TypeError::Serialization(_))
        ));
    }
}
