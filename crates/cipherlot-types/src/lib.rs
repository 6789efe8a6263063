//! Foundation types for Cipherlot.
//!
//! This crate provides the identifier, temporal, and document types shared by
//! the node and the client. Every other Cipherlot crate depends on
//! `cipherlot-types`.
//!
//! # Key Types
//!
//! - [`Cid`] -- Canonical self-describing content identifier (CIDv1, base32)
//! - [`Digest`] -- Raw 32-byte SHA-256 digest carried inside a [`Cid`]
//! - [`Manifest`] -- Metadata document pointing at content-addressed chunks
//! - [`FeedEntry`] -- One publication event in an author's feed
//! - [`Timestamp`] -- Unix-seconds timestamp used for feed ordering

pub mod cid;
pub mod digest;
pub mod error;
pub mod feed;
pub mod manifest;
pub mod temporal;

pub use cid::{decode, encode, Cid, CODEC_RAW};
pub use digest::Digest;
pub use error::{CidError, TypeError};
pub use feed::FeedEntry;
pub use manifest::{EncryptionDescriptor, Manifest};
pub use temporal::Timestamp;
