use std::sync::Arc;

use chrono::{DateTime, Utc};

use cipherlot_crypto::ContentHasher;
use cipherlot_feed::validate_author;
use cipherlot_protocol::deep_link;
use cipherlot_types::{FeedEntry, Manifest, Timestamp};

use crate::error::SyncResult;
use crate::transport::NodeTransport;
use crate::types::PublishReceipt;

/// Publishes content for one author.
///
/// Steps run strictly in order (blob, manifest, feed entry) and the first
/// failure aborts the rest. Nothing is rolled back: objects written before a
/// failure stay on the node, which is harmless for content-addressed data.
pub struct Publisher {
    transport: Arc<dyn NodeTransport>,
    author: String,
    hasher: ContentHasher,
}

impl Publisher {
    pub fn new(transport: Arc<dyn NodeTransport>, author: impl Into<String>) -> SyncResult<Self> {
        let author = author.into();
        validate_author(&author)?;
        Ok(Self {
            transport,
            author,
            hasher: ContentHasher::RAW,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Publish `content`, stamping the feed entry with `ts` or the current time.
    pub async fn publish(&self, content: &[u8], ts: Option<Timestamp>) -> SyncResult<PublishReceipt> {
        self.publish_at(content, ts, Utc::now()).await
    }

    /// Publish with an explicit manifest creation time.
    pub async fn publish_at(
        &self,
        content: &[u8],
        ts: Option<Timestamp>,
        created: DateTime<Utc>,
    ) -> SyncResult<PublishReceipt> {
        let blob = self.hasher.hash(content);
        self.transport.put_blob(&blob, content).await?;

        let manifest = Manifest::new(self.author.as_str(), vec![blob], created);
        let (manifest_id, manifest_bytes) = self.hasher.hash_json(&manifest)?;
        self.transport
            .put_manifest(&manifest_id, &manifest_bytes)
            .await?;

        let entry = FeedEntry::new(manifest_id, ts.unwrap_or_else(Timestamp::now));
        self.transport.append_feed(&self.author, &entry).await?;

        tracing::info!(
            author = %self.author,
            blob = %blob,
            manifest = %manifest_id,
            ts = %entry.ts,
            "published"
        );
        Ok(PublishReceipt {
            blob,
            manifest: manifest_id,
            deep_link: deep_link(&manifest_id),
            entry,
        })
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::local::LocalTransport;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use cipherlot_types::Cid;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn publish_hello_as_bob() {
        let node = LocalTransport::in_memory();
        let publisher = Publisher::new(Arc::new(node.clone()), "bob").unwrap();
        let receipt = publisher
            .publish_at(b"hello", Some(Timestamp::new(100)), created())
            .await
            .unwrap();

        assert_eq!(
            receipt.blob.to_string(),
            "bafkreibm6jg3ux5qumhcn2b3flc3tyu6dmlb4xa7u5bf44yegnrjhc4yeq"
        );
        assert_eq!(node.blobs().get(&receipt.blob).unwrap().unwrap(), b"hello");

        let manifest_bytes = node.manifests().get(&receipt.manifest).unwrap().unwrap();
        let manifest = Manifest::from_slice(&manifest_bytes).unwrap();
        assert_eq!(manifest.author, "bob");
        assert_eq!(manifest.chunks, vec![receipt.blob]);
        assert_eq!(manifest.created, "2024-05-01T12:00:00Z");
        assert_eq!(node.manifests().count().unwrap(), 1);

        let feed = node.feeds().read("bob", None).unwrap();
        assert_eq!(feed, vec![FeedEntry::new(receipt.manifest, 100)]);
        assert_eq!(receipt.entry, feed[0]);
        assert_eq!(receipt.deep_link, format!("vault://cid/{}", receipt.manifest));
    }

    #[tokio::test]
    async fn publish_defaults_ts_to_now() {
        let node = LocalTransport::in_memory();
        let publisher = Publisher::new(Arc::new(node), "bob").unwrap();
        let before = Timestamp::now();
        let receipt = publisher.publish(b"data", None).await.unwrap();
        assert!(receipt.entry.ts >= before);
    }

    #[tokio::test]
    async fn republishing_same_content_reuses_blob() {
        let node = LocalTransport::in_memory();
        let publisher = Publisher::new(Arc::new(node.clone()), "bob").unwrap();
        let first = publisher.publish_at(b"same", Some(Timestamp::new(1)), created()).await.unwrap();
        let second = publisher.publish_at(b"same", Some(Timestamp::new(2)), created()).await.unwrap();
        assert_eq!(first.blob, second.blob);
        assert_eq!(first.manifest, second.manifest);
        assert_eq!(node.blobs().count().unwrap(), 1);
        assert_eq!(node.feeds().read("bob", None).unwrap().len(), 2);
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Step {
        Blob,
        Manifest,
        Feed,
    }

    /// Delegates to a local node but refuses one publishing step.
    struct RefusingNode {
        inner: LocalTransport,
        refuse: Step,
    }

    impl RefusingNode {
        fn check(&self, step: Step) -> SyncResult<()> {
            if step == self.refuse {
                return Err(SyncError::Transport("node unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl NodeTransport for RefusingNode {
        async fn put_blob(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
            self.check(Step::Blob)?;
            self.inner.put_blob(id, payload).await
        }
        async fn get_blob(&self, id: &Cid) -> SyncResult<Vec<u8>> {
            self.inner.get_blob(id).await
        }
        async fn put_manifest(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
            self.check(Step::Manifest)?;
            self.inner.put_manifest(id, payload).await
        }
        async fn get_manifest(&self, id: &Cid) -> SyncResult<Vec<u8>> {
            self.inner.get_manifest(id).await
        }
        async fn append_feed(&self, author: &str, entry: &FeedEntry) -> SyncResult<()> {
            self.check(Step::Feed)?;
            self.inner.append_feed(author, entry).await
        }
        async fn read_feed(&self, author: &str, since: Option<Timestamp>) -> SyncResult<Vec<FeedEntry>> {
            self.inner.read_feed(author, since).await
        }
    }

    /// Publish through a node refusing `step`; returns what landed on it.
    async fn publish_refused(step: Step) -> (SyncError, usize, usize, usize) {
        let node = LocalTransport::in_memory();
        let refusing = RefusingNode {
            inner: node.clone(),
            refuse: step,
        };
        let publisher = Publisher::new(Arc::new(refusing), "bob").unwrap();
        let err = publisher
            .publish_at(b"payload", Some(Timestamp::new(5)), created())
            .await
            .unwrap_err();
        (
            err,
            node.blobs().count().unwrap(),
            node.manifests().count().unwrap(),
            node.feeds().read("bob", None).unwrap().len(),
        )
    }

    #[tokio::test]
    async fn blob_failure_aborts_before_manifest() {
        let (err, blobs, manifests, entries) = publish_refused(Step::Blob).await;
        assert!(matches!(err, SyncError::Transport(_)));
        assert_eq!((blobs, manifests, entries), (0, 0, 0));
    }

    #[tokio::test]
    async fn manifest_failure_aborts_before_feed() {
        let (err, blobs, manifests, entries) = publish_refused(Step::Manifest).await;
        assert!(matches!(err, SyncError::Transport(_)));
        assert_eq!((blobs, manifests, entries), (1, 0, 0));
    }

    #[tokio::test]
    async fn feed_failure_is_returned() {
        let (err, blobs, manifests, entries) = publish_refused(Step::Feed).await;
        assert!(matches!(err, SyncError::Transport(msg) if msg == "node unavailable"));
        assert_eq!((blobs, manifests, entries), (1, 1, 0));
    }

    #[test]
    fn invalid_author_rejected_up_front() {
        let node = Arc::new(LocalTransport::in_memory());
        assert!(matches!(
            Publisher::new(node, "../bob"),
            Err(SyncError::Feed(_))
        ));
    }
}
