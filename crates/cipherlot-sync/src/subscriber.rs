use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cipherlot_crypto::ContentHasher;
use cipherlot_feed::validate_author;
use cipherlot_types::{Cid, FeedEntry, Manifest, Timestamp};

use crate::error::{SyncError, SyncResult};
use crate::transport::NodeTransport;
use crate::types::{PollReport, SkippedEntry};

/// Reports buffered for a handle that is not reading them.
const REPORT_BUFFER: usize = 16;

/// Shortest period `spawn` will poll at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// File name a downloaded payload is written under.
///
/// The manifest's creation time names the file, falling back to the feed
/// entry's timestamp; `:` and `/` become `_` and the first eight characters
/// of the blob identifier are appended.
pub fn output_file_name(manifest: &Manifest, entry: &FeedEntry, blob: &Cid) -> String {
    let name = if manifest.created.is_empty() {
        entry
            .ts
            .to_rfc3339()
            .unwrap_or_else(|| entry.ts.to_string())
    } else {
        manifest.created.clone()
    };
    let name = name.replace([':', '/'], "_");
    format!("{name}_{}.bin", blob.short())
}

/// Follows one author's feed and downloads new publications.
///
/// The watermark is the timestamp of the last entry known to be fully
/// downloaded. Feed reads return entries strictly after it, so after a
/// failed entry the watermark is held strictly below that entry's timestamp
/// and the entry is fetched again next time.
pub struct Subscriber {
    transport: Arc<dyn NodeTransport>,
    author: String,
    out_dir: PathBuf,
    watermark: Option<Timestamp>,
}

impl Subscriber {
    pub fn new(
        transport: Arc<dyn NodeTransport>,
        author: impl Into<String>,
        out_dir: impl Into<PathBuf>,
    ) -> SyncResult<Self> {
        let author = author.into();
        validate_author(&author)?;
        Ok(Self {
            transport,
            author,
            out_dir: out_dir.into(),
            watermark: None,
        })
    }

    /// Start after `since` instead of from the beginning of the feed.
    pub fn since(mut self, since: Option<Timestamp>) -> Self {
        self.watermark = since;
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn watermark(&self) -> Option<Timestamp> {
        self.watermark
    }

    /// Run one poll cycle.
    ///
    /// Fails only if the feed itself cannot be read; per-entry failures are
    /// listed in the report's `skipped`.
    pub async fn poll_once(&mut self) -> SyncResult<PollReport> {
        let entries = self
            .transport
            .read_feed(&self.author, self.watermark)
            .await?;

        let mut report = PollReport {
            entries: entries.len(),
            ..PollReport::default()
        };
        let mut completed = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.download(&entry).await {
                Ok(path) => {
                    tracing::info!(author = %self.author, path = %path.display(), "downloaded");
                    completed.push(entry.ts);
                    report.downloaded.push(path);
                }
                Err(e) => {
                    tracing::warn!(
                        author = %self.author,
                        cid = %entry.cid,
                        ts = %entry.ts,
                        error = %e,
                        "skipping feed entry"
                    );
                    report.skipped.push(SkippedEntry {
                        entry,
                        reason: e.to_string(),
                    });
                }
            }
        }
        let ceiling = report.skipped.iter().map(|s| s.entry.ts).min();
        self.watermark = advance_watermark(self.watermark, &completed, ceiling);
        report.watermark = self.watermark;
        Ok(report)
    }

    async fn download(&self, entry: &FeedEntry) -> SyncResult<PathBuf> {
        let manifest_bytes = self.transport.get_manifest(&entry.cid).await?;
        verify(&entry.cid, &manifest_bytes)?;
        let manifest = Manifest::from_slice(&manifest_bytes)?;

        let blob = *manifest
            .first_chunk()
            .ok_or(SyncError::EmptyManifest(entry.cid))?;
        let data = self.transport.get_blob(&blob).await?;
        verify(&blob, &data)?;

        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(output_file_name(&manifest, entry, &blob));
        tokio::fs::write(&path, &data).await?;
        Ok(path)
    }

    /// Poll every `every` on a background task until the handle stops it.
    ///
    /// The first cycle runs immediately. A cycle in progress always finishes
    /// before the task exits.
    /// Periods below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn spawn(self, every: Duration) -> SubscriptionHandle {
        let every = every.max(MIN_POLL_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let (watermark_tx, watermark_rx) = watch::channel(self.watermark);
        let (report_tx, report_rx) = mpsc::channel(REPORT_BUFFER);

        let mut subscriber = self;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        match subscriber.poll_once().await {
                            Ok(report) => {
                                watermark_tx.send_replace(report.watermark);
                                let _ = report_tx.try_send(report);
                            }
                            Err(e) => {
                                tracing::warn!(author = %subscriber.author, error = %e, "feed poll failed");
                            }
                        }
                    }
                }
            }
            subscriber
        });

        SubscriptionHandle {
            shutdown: shutdown_tx,
            watermark: watermark_rx,
            reports: report_rx,
            task,
        }
    }
}

/// Highest completed timestamp, kept strictly below `ceiling` (the earliest
/// failed entry) when there is one. Never moves backwards.
fn advance_watermark(
    start: Option<Timestamp>,
    completed: &[Timestamp],
    ceiling: Option<Timestamp>,
) -> Option<Timestamp> {
    let reached = completed
        .iter()
        .copied()
        .filter(|ts| ceiling.map_or(true, |c| *ts < c))
        .max();
    start.max(reached)
}

fn verify(id: &Cid, data: &[u8]) -> SyncResult<()> {
    if ContentHasher::RAW.verify(data, id) {
        Ok(())
    } else {
        Err(SyncError::DigestMismatch {
            id: *id,
            computed: ContentHasher::RAW.hash(data),
        })
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("author", &self.author)
            .field("out_dir", &self.out_dir)
            .field("watermark", &self.watermark)
            .finish_non_exhaustive()
    }
}

/// Control handle for a running subscription.
pub struct SubscriptionHandle {
    shutdown: watch::Sender<bool>,
    watermark: watch::Receiver<Option<Timestamp>>,
    reports: mpsc::Receiver<PollReport>,
    task: JoinHandle<Subscriber>,
}

impl SubscriptionHandle {
    /// Watermark after the most recent completed cycle.
    pub fn watermark(&self) -> Option<Timestamp> {
        *self.watermark.borrow()
    }

    /// Wait for the next cycle report. `None` once the task has exited.
    pub async fn next_report(&mut self) -> Option<PollReport> {
        self.reports.recv().await
    }

    /// Stop polling and return the final watermark.
    pub async fn stop(self) -> SyncResult<Option<Timestamp>> {
        let _ = self.shutdown.send(true);
        let subscriber = self
            .task
            .await
            .map_err(|e| SyncError::Task(e.to_string()))?;
        Ok(subscriber.watermark())
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("watermark", &self.watermark())
            .finish_non_exhaustive()
    }
}
