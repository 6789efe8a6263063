//! Client side of Cipherlot.
//!
//! A [`Publisher`] turns content into a blob, a manifest describing it, and a
//! feed entry announcing it, always in that order so a feed never points at
//! something that does not exist yet. A [`Subscriber`] reads an author's feed
//! and downloads whatever it has not seen, tracking progress with a
//! timestamp watermark.
//!
//! Both talk to a node through the [`NodeTransport`] trait:
//!
//! - [`HttpTransport`] -- the node's HTTP gateway, via `reqwest`
//! - [`LocalTransport`] -- stores in the same process

pub mod error;
pub mod http;
pub mod local;
pub mod publisher;
pub mod subscriber;
pub mod transport;
pub mod types;

pub use error::{SyncError, SyncResult};
pub use http::HttpTransport;
pub use local::LocalTransport;
pub use publisher::Publisher;
pub use subscriber::{output_file_name, Subscriber, SubscriptionHandle, MIN_POLL_INTERVAL};
pub use transport::NodeTransport;
pub use types::{PollReport, PublishReceipt, SkippedEntry};
