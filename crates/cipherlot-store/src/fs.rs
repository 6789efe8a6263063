use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cipherlot_types::Cid;
use tempfile::NamedTempFile;

use crate::error::StoreResult;
use crate::object::ObjectKind;
use crate::traits::ObjectStore;

/// Filesystem object store: one file per object, named by its identifier.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so readers see either the old object or the new one. Identifiers
/// only contain base32 characters, which keeps every key a plain file name.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    kind: ObjectKind,
}

impl FsObjectStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, kind: ObjectKind) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, kind })
    }

    /// The blob store under `data_root/blobs`.
    pub fn blobs(data_root: &Path) -> StoreResult<Self> {
        Self::open(data_root.join(ObjectKind::Blob.dir_name()), ObjectKind::Blob)
    }

    /// The manifest store under `data_root/manifests`.
    pub fn manifests(data_root: &Path) -> StoreResult<Self> {
        Self::open(
            data_root.join(ObjectKind::Manifest.dir_name()),
            ObjectKind::Manifest,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &Cid) -> PathBuf {
        self.root.join(id.to_string())
    }
}

impl ObjectStore for FsObjectStore {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn put(&self, id: &Cid, payload: &[u8]) -> StoreResult<()> {
        self.kind.verify(id, payload)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(payload)?;
        tmp.as_file().sync_data()?;
        tmp.persist(self.path_for(id)).map_err(|e| e.error)?;

        tracing::debug!(kind = %self.kind, %id, bytes = payload.len(), "stored object");
        Ok(())
    }

    fn get(&self, id: &Cid) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(id)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, id: &Cid) -> StoreResult<bool> {
        Ok(self.path_for(id).is_file())
    }

    fn count(&self) -> StoreResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            // Skip in-flight temp files and anything else that is not an object.
            let is_object = entry
                .file_name()
                .to_str()
                .is_some_and(|name| Cid::parse(name).is_ok());
            if is_object {
                count += 1;
            }
        }
        Ok(count)
    }
}
