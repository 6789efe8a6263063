use std::collections::HashMap;
use std::sync::RwLock;

use cipherlot_types::{FeedEntry, Timestamp};

use crate::error::{FeedError, FeedResult};
use crate::names::validate_author;
use crate::query::select;
use crate::traits::FeedLog;

/// In-memory feed log for tests and embedding.
///
/// Entries are kept in append order and sorted on read, exactly like the
/// filesystem backend.
#[derive(Default)]
pub struct InMemoryFeedLog {
    feeds: RwLock<HashMap<String, Vec<FeedEntry>>>,
}

impl InMemoryFeedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries appended for `author`.
    pub fn len(&self, author: &str) -> FeedResult<usize> {
        let feeds = self.feeds.read().map_err(|_| FeedError::LockPoisoned)?;
        Ok(feeds.get(author).map_or(0, Vec::len))
    }
}

impl FeedLog for InMemoryFeedLog {
    fn append(&self, author: &str, entry: &FeedEntry) -> FeedResult<()> {
        validate_author(author)?;
        let mut feeds = self.feeds.write().map_err(|_| FeedError::LockPoisoned)?;
        feeds.entry(author.to_string()).or_default().push(entry.clone());
        tracing::debug!(author, cid = %entry.cid, ts = %entry.ts, "appended feed entry");
        Ok(())
    }

    fn read(&self, author: &str, since: Option<Timestamp>) -> FeedResult<Vec<FeedEntry>> {
        validate_author(author)?;
        let feeds = self.feeds.read().map_err(|_| FeedError::LockPoisoned)?;
        Ok(feeds
            .get(author)
            .map(|entries| select(entries.iter().cloned(), since))
            .unwrap_or_default())
    }

    fn authors(&self) -> FeedResult<Vec<String>> {
        let feeds = self.feeds.read().map_err(|_| FeedError::LockPoisoned)?;
        let mut authors: Vec<String> = feeds.keys().cloned().collect();
        authors.sort();
        Ok(authors)
    }
}

impl std::fmt::Debug for InMemoryFeedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFeedLog")
            .field("authors", &self.authors().unwrap_or_default().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlot_crypto::ContentHasher;

    fn entry(data: &[u8], ts: i64) -> FeedEntry {
        FeedEntry::new(ContentHasher::RAW.hash(data), ts)
    }

    #[test]
    fn append_then_read() {
        let log = InMemoryFeedLog::new();
        log.append("bob", &entry(b"m1", 10)).unwrap();
        let entries = log.read("bob", None).unwrap();
        assert_eq!(entries, vec![entry(b"m1", 10)]);
        assert_eq!(log.len("bob").unwrap(), 1);
    }

    #[test]
    fn unknown_author_is_empty() {
        let log = InMemoryFeedLog::new();
        assert!(log.read("nobody", None).unwrap().is_empty());
        assert_eq!(log.len("nobody").unwrap(), 0);
    }

    #[test]
    fn out_of_order_appends_read_sorted() {
        let log = InMemoryFeedLog::new();
        for (data, ts) in [(b"a", 100), (b"b", 200), (b"c", 50)] {
            log.append("bob", &entry(data, ts)).unwrap();
        }
        let ts: Vec<i64> = log
            .read("bob", None)
            .unwrap()
            .iter()
            .map(|e| e.ts.as_secs())
            .collect();
        assert_eq!(ts, vec![50, 100, 200]);

        let after: Vec<i64> = log
            .read("bob", Some(Timestamp::new(50)))
            .unwrap()
            .iter()
            .map(|e| e.ts.as_secs())
            .collect();
        assert_eq!(after, vec![100, 200]);
    }

    #[test]
    fn feeds_are_per_author() {
        let log = InMemoryFeedLog::new();
        log.append("bob", &entry(b"x", 1)).unwrap();
        log.append("alice", &entry(b"y", 2)).unwrap();
        assert_eq!(log.read("bob", None).unwrap().len(), 1);
        assert_eq!(log.authors().unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn invalid_author_rejected() {
        let log = InMemoryFeedLog::new();
        assert!(matches!(
            log.append("../x", &entry(b"x", 1)),
            Err(FeedError::InvalidAuthor { .. })
        ));
        assert!(log.read("", None).is_err());
        assert!(log.authors().unwrap().is_empty());
    }
}
