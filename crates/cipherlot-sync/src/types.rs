use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use cipherlot_types::{Cid, FeedEntry, Timestamp};

/// Everything a successful publish created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub blob: Cid,
    pub manifest: Cid,
    pub entry: FeedEntry,
    /// `vault://cid/<manifest>`.
    pub deep_link: String,
}

/// A feed entry a poll cycle could not download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub entry: FeedEntry,
    pub reason: String,
}

/// Outcome of one subscriber poll cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollReport {
    /// Entries the feed returned.
    pub entries: usize,
    /// Files written, in feed order.
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
    /// Watermark after the cycle.
    pub watermark: Option<Timestamp>,
}

impl PollReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
