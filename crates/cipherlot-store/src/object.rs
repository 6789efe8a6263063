use cipherlot_crypto::ContentHasher;
use cipherlot_types::Cid;

use crate::error::{StoreError, StoreResult};

/// The kind of object a store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Opaque payload bytes.
    Blob,
    /// JSON metadata document.
    Manifest,
}

impl ObjectKind {
    /// Directory name under the node's data root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Blob => "blobs",
            Self::Manifest => "manifests",
        }
    }

    /// Media type objects of this kind are served with.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Blob => "application/octet-stream",
            Self::Manifest => "application/json",
        }
    }

    /// Check that `payload` may be stored under `id`.
    ///
    /// Manifests must parse as JSON first; the digest is always computed over
    /// the raw bytes as given, never over a re-serialized form.
    pub fn verify(&self, id: &Cid, payload: &[u8]) -> StoreResult<()> {
        if *self == Self::Manifest {
            serde_json::from_slice::<serde::de::IgnoredAny>(payload)
                .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        }
        if !ContentHasher::RAW.verify(payload, id) {
            return Err(StoreError::DigestMismatch {
                id: *id,
                computed: ContentHasher::RAW.hash(payload),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}
