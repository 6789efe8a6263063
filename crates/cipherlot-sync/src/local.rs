use std::sync::Arc;

use async_trait::async_trait;

use cipherlot_feed::{FeedLog, InMemoryFeedLog};
use cipherlot_store::{InMemoryObjectStore, ObjectStore};
use cipherlot_types::{Cid, FeedEntry, Timestamp};

use crate::error::{SyncError, SyncResult};
use crate::transport::NodeTransport;

/// Transport over stores living in the same process.
///
/// Store calls run inline, so this is meant for memory-backed stores and
/// for embedding a node next to its client.
#[derive(Clone)]
pub struct LocalTransport {
    blobs: Arc<dyn ObjectStore>,
    manifests: Arc<dyn ObjectStore>,
    feeds: Arc<dyn FeedLog>,
}

impl LocalTransport {
    pub fn new(
        blobs: Arc<dyn ObjectStore>,
        manifests: Arc<dyn ObjectStore>,
        feeds: Arc<dyn FeedLog>,
    ) -> Self {
        Self {
            blobs,
            manifests,
            feeds,
        }
    }

    /// A fresh node held entirely in memory.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryObjectStore::blobs()),
            Arc::new(InMemoryObjectStore::manifests()),
            Arc::new(InMemoryFeedLog::new()),
        )
    }

    pub fn blobs(&self) -> &Arc<dyn ObjectStore> {
        &self.blobs
    }

    pub fn manifests(&self) -> &Arc<dyn ObjectStore> {
        &self.manifests
    }

    pub fn feeds(&self) -> &Arc<dyn FeedLog> {
        &self.feeds
    }

    fn fetch(store: &dyn ObjectStore, id: &Cid) -> SyncResult<Vec<u8>> {
        store
            .get(id)?
            .ok_or_else(|| SyncError::NotFound(format!("{} {id}", store.kind())))
    }
}

impl std::fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl NodeTransport for LocalTransport {
    async fn put_blob(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
        Ok(self.blobs.put(id, payload)?)
    }

    async fn get_blob(&self, id: &Cid) -> SyncResult<Vec<u8>> {
        Self::fetch(self.blobs.as_ref(), id)
    }

    async fn put_manifest(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
        Ok(self.manifests.put(id, payload)?)
    }

    async fn get_manifest(&self, id: &Cid) -> SyncResult<Vec<u8>> {
        Self::fetch(self.manifests.as_ref(), id)
    }

    async fn append_feed(&self, author: &str, entry: &FeedEntry) -> SyncResult<()> {
        Ok(self.feeds.append(author, entry)?)
    }

    async fn read_feed(&self, author: &str, since: Option<Timestamp>) -> SyncResult<Vec<FeedEntry>> {
        Ok(self.feeds.read(author, since)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlot_crypto::ContentHasher;

    #[tokio::test]
    async fn missing_objects_are_not_found() {
        let transport = LocalTransport::in_memory();
        let id = ContentHasher::RAW.hash(b"absent");
        assert!(matches!(
            transport.get_blob(&id).await,
            Err(SyncError::NotFound(_))
        ));
        assert!(matches!(
            transport.get_manifest(&id).await,
            Err(SyncError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn store_rejections_propagate() {
        let transport = LocalTransport::in_memory();
        let id = ContentHasher::RAW.hash(b"one");
        assert!(matches!(
            transport.put_blob(&id, b"two").await,
            Err(SyncError::Store(_))
        ));
        assert!(matches!(
            transport.append_feed("a/b", &FeedEntry::new(id, 1)).await,
            Err(SyncError::Feed(_))
        ));
    }

    #[tokio::test]
    async fn shares_stores_between_clones() {
        let transport = LocalTransport::in_memory();
        let other = transport.clone();
        let id = ContentHasher::RAW.hash(b"shared");
        transport.put_blob(&id, b"shared").await.unwrap();
        assert_eq!(other.get_blob(&id).await.unwrap(), b"shared");
        assert_eq!(other.blobs().count().unwrap(), 1);
    }
}
