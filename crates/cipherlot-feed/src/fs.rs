use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cipherlot_types::{FeedEntry, Timestamp};

use crate::error::{FeedError, FeedResult};
use crate::names::validate_author;
use crate::query::{parse_log, select};
use crate::traits::FeedLog;

/// Filesystem feed log: one newline-delimited JSON file per author.
///
/// Appends to one author are serialized by an in-process lock, and each line
/// is written with a single `write` on an append-mode descriptor so other
/// processes appending to the same file cannot split it.
#[derive(Debug)]
pub struct FsFeedLog {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FsFeedLog {
    /// Open (creating if needed) a feed directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> FeedResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// The feed directory under `data_root/feeds`.
    pub fn under(data_root: &Path) -> FeedResult<Self> {
        Self::open(data_root.join("feeds"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, author: &str) -> PathBuf {
        self.root.join(author)
    }

    fn author_lock(&self, author: &str) -> FeedResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| FeedError::LockPoisoned)?;
        Ok(Arc::clone(locks.entry(author.to_string()).or_default()))
    }
}

impl FeedLog for FsFeedLog {
    fn append(&self, author: &str, entry: &FeedEntry) -> FeedResult<()> {
        validate_author(author)?;

        let mut line = entry
            .to_line()
            .map_err(|e| FeedError::Serialization(e.to_string()))?;
        line.push('\n');

        let lock = self.author_lock(author)?;
        let _guard = lock.lock().map_err(|_| FeedError::LockPoisoned)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(author))?;
        file.write_all(line.as_bytes())?;

        tracing::debug!(author, cid = %entry.cid, ts = %entry.ts, "appended feed entry");
        Ok(())
    }

    fn read(&self, author: &str, since: Option<Timestamp>) -> FeedResult<Vec<FeedEntry>> {
        validate_author(author)?;
        let raw = match fs::read(self.path_for(author)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let text = String::from_utf8_lossy(&raw);
        Ok(select(parse_log(author, &text), since))
    }

    fn authors(&self) -> FeedResult<Vec<String>> {
        let mut authors = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_author(name).is_ok() {
                    authors.push(name.to_string());
                }
            }
        }
        authors.sort();
        Ok(authors)
    }
}
