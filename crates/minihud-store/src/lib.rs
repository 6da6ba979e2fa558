//! Chunked key/value persistence for MiniHUD records.
//!
//! The host gives every game object a flat string key/value space with a
//! bounded size per slot. This crate stores typed records in that space by
//! encoding them as JSON and spreading the text over indexed chunk entries.
//!
//! # Entry Stores
//!
//! All backends implement the [`EntryStore`] trait:
//!
//! - [`InMemoryEntryStore`]: `HashMap`-based store for tests and embedding
//! - [`FileEntryStore`]: JSON document on disk, one section per object id
//!
//! # Design Rules
//!
//! 1. An empty value is the same as an absent key.
//! 2. A save that exceeds the payload ceiling writes nothing.
//! 3. A load that cannot reassemble the record yields the caller's fallback.
//! 4. Multi-key writes are not atomic; the meta entry is written first.
//! 5. The version tag is stored but never interpreted.

pub mod chunked;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use chunked::{
    split_chunks, ChunkLimits, ChunkMeta, ChunkReport, ChunkedStore, DEFAULT_CHUNK_WIDTH,
    DEFAULT_MAX_PAYLOAD,
};
pub use error::{StoreError, StoreResult};
pub use file::FileEntryStore;
pub use memory::InMemoryEntryStore;
pub use traits::EntryStore;
