use cipherlot_types::Cid;

use crate::error::StoreResult;
use crate::object::ObjectKind;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - `put` succeeds only if the payload's SHA-256 digest equals the digest
///   named by `id`. Nothing is written otherwise.
/// - Re-putting identical bytes under the same id succeeds and leaves the
///   stored content unchanged.
/// - Kind-specific validation (see [`ObjectKind::verify`]) runs before
///   anything is written.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// What this store holds.
    fn kind(&self) -> ObjectKind;

    /// Verify and store `payload` under `id`, replacing any prior value.
    fn put(&self, id: &Cid, payload: &[u8]) -> StoreResult<()>;

    /// Read an object by its identifier.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn get(&self, id: &Cid) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &Cid) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Number of stored objects.
    fn count(&self) -> StoreResult<usize>;
}
