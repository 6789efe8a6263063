//! HTTP wire protocol for Cipherlot.
//!
//! Defines the endpoint paths, JSON request/response bodies, and deep-link
//! format shared by the node gateway and its clients.

pub mod endpoint;
pub mod error;
pub mod link;
pub mod message;

pub use endpoint::{endpoints, HealthResponse, StatusResponse, StorageCounts};
pub use error::{ProtocolError, ProtocolResult};
pub use link::{deep_link, parse_deep_link, DEEP_LINK_PREFIX};
pub use message::{AppendRequest, ErrorBody, FeedQuery, MAX_BODY_SIZE};
