//! Content-addressed object storage for Cipherlot.
//!
//! Every stored object is keyed by the [`Cid`](cipherlot_types::Cid) of its
//! exact bytes. A write is accepted only if the payload hashes to the key it
//! is written under, which makes overwrites harmless and concurrent writes of
//! the same key safe.
//!
//! # Object Kinds
//!
//! - [`ObjectKind::Blob`] -- opaque payload bytes
//! - [`ObjectKind::Manifest`] -- JSON metadata documents (must parse)
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- one file per object under a directory
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Integrity is checked on write; the key must name the payload's digest.
//! 2. The store never re-serializes: input bytes are authoritative.
//! 3. A single `put` is atomic; readers never see a partial object.
//! 4. The store never retries and never deletes.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::ObjectKind;
pub use traits::ObjectStore;
