use cipherlot_types::{Cid, Digest, CODEC_RAW};
use sha2::{Digest as _, Sha256};

/// SHA-256 content hasher producing identifiers with a fixed content type.
///
/// The content-type tag is descriptive only: [`ContentHasher::verify`]
/// compares digests, so an identifier minted with another tag still
/// verifies against the same bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    codec: u8,
}

impl ContentHasher {
    /// Hasher for raw payloads. Blobs and manifests both use it.
    pub const RAW: Self = Self { codec: CODEC_RAW };

    /// Create a hasher with a custom content-type tag.
    pub const fn new(codec: u8) -> Self {
        Self { codec }
    }

    /// Compute the identifier for `data`.
    pub fn hash(&self, data: &[u8]) -> Cid {
        Cid::with_codec(self.codec, Self::digest(data))
    }

    /// Hash a serializable value as compact JSON.
    ///
    /// Returns the exact bytes alongside the identifier: the identifier is
    /// only meaningful for those bytes.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<(Cid, Vec<u8>), HasherError> {
        let data = serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok((self.hash(&data), data))
    }

    /// Verify that `data` hashes to the digest named by `expected`.
    pub fn verify(&self, data: &[u8], expected: &Cid) -> bool {
        Self::digest(data) == expected.digest()
    }

    /// Raw SHA-256 digest.
    pub fn digest(data: &[u8]) -> Digest {
        Digest::from_hash(Sha256::digest(data).into())
    }

    /// The content-type tag stamped on identifiers from this hasher.
    pub fn codec(&self) -> u8 {
        self.codec
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(ContentHasher::RAW.hash(data), ContentHasher::RAW.hash(data));
    }

    #[test]
    fn hello_matches_known_identifier() {
        let cid = ContentHasher::RAW.hash(b"hello");
        assert_eq!(
            cid.to_string(),
            "bafkreibm6jg3ux5qumhcn2b3flc3tyu6dmlb4xa7u5bf44yegnrjhc4yeq"
        );
        assert_eq!(
            ContentHasher::digest(b"hello").to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn empty_payload_hashes() {
        assert_eq!(
            ContentHasher::RAW.hash(b"").to_string(),
            "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku"
        );
    }

    #[test]
    fn verify_correct_data() {
        let id = ContentHasher::RAW.hash(b"test data");
        assert!(ContentHasher::RAW.verify(b"test data", &id));
    }

    #[test]
    fn verify_rejects_single_bit_flip() {
        let mut data = b"original".to_vec();
        let id = ContentHasher::RAW.hash(&data);
        data[0] ^= 0x01;
        assert!(!ContentHasher::RAW.verify(&data, &id));
    }

    #[test]
    fn verify_ignores_content_type() {
        let foreign = ContentHasher::new(0x71).hash(b"doc");
        assert_eq!(foreign.codec(), 0x71);
        assert!(ContentHasher::RAW.verify(b"doc", &foreign));
    }

    #[test]
    fn hash_json_returns_hashed_bytes() {
        let value = serde_json::json!({"key": "value", "num": 42});
        let (id, bytes) = ContentHasher::RAW.hash_json(&value).unwrap();
        assert_eq!(id, ContentHasher::RAW.hash(&bytes));
        assert_eq!(bytes, serde_json::to_vec(&value).unwrap());
    }
}
