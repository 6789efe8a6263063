//! Per-author publication feeds for Cipherlot.
//!
//! A feed is an append-only log of [`FeedEntry`](cipherlot_types::FeedEntry)
//! values, one JSON document per line. Readers get entries ordered by
//! timestamp regardless of the order they were appended in.
//!
//! # Backends
//!
//! - [`FsFeedLog`] -- one log file per author under a directory
//! - [`InMemoryFeedLog`] -- same semantics, held in memory
//!
//! # Read Semantics
//!
//! 1. An author without a log reads as an empty feed.
//! 2. Lines that do not parse are skipped, never fatal.
//! 3. `since` keeps only entries strictly after it.
//! 4. Entries sort by timestamp, then by identifier string.

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod query;
pub mod traits;

pub use error::{FeedError, FeedResult};
pub use fs::FsFeedLog;
pub use memory::InMemoryFeedLog;
pub use names::validate_author;
pub use traits::FeedLog;
