//! Content hashing for Cipherlot.
//!
//! Provides SHA-256 hashing and identifier derivation. Everything that needs
//! to turn bytes into a [`Cid`](cipherlot_types::Cid), or check bytes against
//! one, goes through [`ContentHasher`].
//!
//! All hashing is delegated to the `sha2` crate.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
