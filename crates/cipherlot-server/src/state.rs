use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cipherlot_feed::{FeedLog, FsFeedLog, InMemoryFeedLog};
use cipherlot_store::{FsObjectStore, InMemoryObjectStore, ObjectStore};

use crate::error::ServerResult;

/// Shared handles passed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub blobs: Arc<dyn ObjectStore>,
    pub manifests: Arc<dyn ObjectStore>,
    pub feeds: Arc<dyn FeedLog>,
    pub data_root: PathBuf,
    pub hostname: String,
    pub started: Instant,
}

/// The machine's host name, or empty when it is unavailable or not UTF-8.
pub fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.into_string().unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "cannot read host name");
            String::new()
        }
    }
}

impl AppState {
    /// Open filesystem-backed stores under `data_root`.
    pub fn open(data_root: &Path) -> ServerResult<Self> {
        Ok(Self {
            blobs: Arc::new(FsObjectStore::blobs(data_root)?),
            manifests: Arc::new(FsObjectStore::manifests(data_root)?),
            feeds: Arc::new(FsFeedLog::under(data_root)?),
            data_root: data_root.to_path_buf(),
            hostname: local_hostname(),
            started: Instant::now(),
        })
    }

    /// Memory-backed state, for tests and embedding.
    pub fn in_memory() -> Self {
        Self {
            blobs: Arc::new(InMemoryObjectStore::blobs()),
            manifests: Arc::new(InMemoryObjectStore::manifests()),
            feeds: Arc::new(InMemoryFeedLog::new()),
            data_root: PathBuf::from(":memory:"),
            hostname: local_hostname(),
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("data_root", &self.data_root)
            .field("uptime_secs", &self.uptime_secs())
            .finish_non_exhaustive()
    }
}
