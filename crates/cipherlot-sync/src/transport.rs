use async_trait::async_trait;
use cipherlot_types::{Cid, FeedEntry, Timestamp};

use crate::error::SyncResult;

/// Operations a client needs from a Cipherlot node.
///
/// Missing objects are reported as [`SyncError::NotFound`](crate::SyncError::NotFound).
#[async_trait]
pub trait NodeTransport: Send + Sync {
    async fn put_blob(&self, id: &Cid, payload: &[u8]) -> SyncResult<()>;
    async fn get_blob(&self, id: &Cid) -> SyncResult<Vec<u8>>;
    async fn put_manifest(&self, id: &Cid, payload: &[u8]) -> SyncResult<()>;
    async fn get_manifest(&self, id: &Cid) -> SyncResult<Vec<u8>>;
    async fn append_feed(&self, author: &str, entry: &FeedEntry) -> SyncResult<()>;
    async fn read_feed(&self, author: &str, since: Option<Timestamp>) -> SyncResult<Vec<FeedEntry>>;
}
