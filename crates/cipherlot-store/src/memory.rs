use std::collections::HashMap;
use std::sync::RwLock;

use cipherlot_types::Cid;

use crate::error::{StoreError, StoreResult};
use crate::object::ObjectKind;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. Objects are held behind a `RwLock` and
/// cloned on read. Applies the same verification as the filesystem backend.
pub struct InMemoryObjectStore {
    kind: ObjectKind,
    objects: RwLock<HashMap<Cid, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create a new empty store for `kind` objects.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn blobs() -> Self {
        Self::new(ObjectKind::Blob)
    }

    pub fn manifests() -> Self {
        Self::new(ObjectKind::Manifest)
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.values().map(|data| data.len() as u64).sum())
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn put(&self, id: &Cid, payload: &[u8]) -> StoreResult<()> {
        self.kind.verify(id, payload)?;
        let mut map = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(*id, payload.to_vec());
        Ok(())
    }

    fn get(&self, id: &Cid) -> StoreResult<Option<Vec<u8>>> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(id).cloned())
    }

    fn exists(&self, id: &Cid) -> StoreResult<bool> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.contains_key(id))
    }

    fn count(&self) -> StoreResult<usize> {
        let map = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.len())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("kind", &self.kind)
            .field("object_count", &self.count().unwrap_or_default())
            .finish()
    }
}
