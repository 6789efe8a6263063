use cipherlot_types::{FeedEntry, Timestamp};

use crate::error::FeedResult;

/// Append-only, per-author feed log.
///
/// Implementations must:
/// - reject author ids that fail [`validate_author`](crate::validate_author);
/// - never interleave two appends to the same author's log;
/// - return entries from `read` in ascending `(ts, identifier)` order.
pub trait FeedLog: Send + Sync {
    /// Append one entry to `author`'s feed, creating it if needed.
    fn append(&self, author: &str, entry: &FeedEntry) -> FeedResult<()>;

    /// Read `author`'s feed, keeping only entries after `since` if given.
    ///
    /// An author with no feed reads as empty.
    fn read(&self, author: &str, since: Option<Timestamp>) -> FeedResult<Vec<FeedEntry>>;

    /// Authors that have a feed, sorted.
    fn authors(&self) -> FeedResult<Vec<String>>;
}
