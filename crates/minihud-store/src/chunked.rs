//! Chunked record codec.
//!
//! A record is encoded as JSON and split into fixed-width slices so that no
//! single entry exceeds the host's per-slot size ceiling:
//!
//! ```text
//! K      -> {"version"?: string, "chunks": N, "size": W}
//! K[0]   -> payload characters 0 .. W
//! K[1]   -> payload characters W .. 2W
//! ...
//! K[N-1] -> the remainder (may be shorter than W)
//! ```
//!
//! Joining `K[0..N]` in index order reproduces the exact JSON text that was
//! encoded. The meta entry and chunks go to the backend as one ordered
//! batch, meta first. Writes are not atomic across keys on every backend,
//! so an interrupted save leaves a record that fails to load and is
//! replaced by the caller's fallback.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::EntryStore;

/// Default split width, in characters.
pub const DEFAULT_CHUNK_WIDTH: usize = 1000;

/// Default ceiling on the encoded payload, in characters.
pub const DEFAULT_MAX_PAYLOAD: usize = 63 * DEFAULT_CHUNK_WIDTH;

/// Metadata entry describing how a record was split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Opaque schema tag. Stored, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of chunk entries.
    pub chunks: usize,
    /// Split width used at write time.
    pub size: usize,
}

/// Size limits applied when saving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLimits {
    /// Split width in characters (at least 1).
    pub width: usize,
    /// Largest encoded payload accepted, in characters.
    pub max_payload: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHUNK_WIDTH,
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// Diagnostic view of a persisted record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkReport {
    pub meta: ChunkMeta,
    /// Character length of each indexed chunk; `None` when the entry is absent.
    pub chunk_lengths: Vec<Option<usize>>,
    /// Chunk entries beyond `meta.chunks` left in the key space.
    pub stray_chunks: usize,
}

impl ChunkReport {
    /// Returns `true` if every chunk named by the meta entry is present and
    /// no chunk is wider than the recorded split width.
    pub fn is_complete(&self) -> bool {
        self.chunk_lengths
            .iter()
            .all(|len| len.is_some_and(|len| len <= self.meta.size))
    }

    /// Total payload characters across present chunks.
    pub fn payload_len(&self) -> usize {
        self.chunk_lengths.iter().flatten().sum()
    }
}

/// Split `payload` into slices of at most `width` characters.
///
/// Slices never split a character. An empty payload yields no slices.
pub fn split_chunks(payload: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(offset, _)| offset);
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Typed record persisted as chunked entries under one key.
pub struct ChunkedStore<S: EntryStore + ?Sized, T> {
    entries: Arc<S>,
    key: String,
    limits: ChunkLimits,
    version: Option<String>,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> ChunkedStore<S, T>
where
    S: EntryStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    /// Chunked record at `key` with default limits and no version tag.
    pub fn new(entries: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            entries,
            key: key.into(),
            limits: ChunkLimits::default(),
            version: None,
            _record: PhantomData,
        }
    }

    pub fn with_limits(mut self, limits: ChunkLimits) -> Self {
        self.limits = ChunkLimits {
            width: limits.width.max(1),
            max_payload: limits.max_payload,
        };
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn limits(&self) -> ChunkLimits {
        self.limits
    }

    /// Key of chunk `index`: `K[index]`.
    pub fn chunk_key(&self, index: usize) -> String {
        format!("{}[{index}]", self.key)
    }

    /// Read and decode the metadata entry. `Ok(None)` if it is absent.
    ///
    /// A meta entry no save could have written (zero split width, or more
    /// chunks than the payload ceiling allows) is reported as
    /// [`StoreError::CorruptRecord`].
    pub fn read_meta(&self) -> StoreResult<Option<ChunkMeta>> {
        let raw = self.entries.get_entry(&self.key)?;
        if raw.is_empty() {
            return Ok(None);
        }
        let meta: ChunkMeta =
            serde_json::from_str(&raw).map_err(|e| StoreError::CorruptRecord {
                key: self.key.clone(),
                reason: format!("bad metadata: {e}"),
            })?;
        if meta.size == 0 {
            return Err(StoreError::CorruptRecord {
                key: self.key.clone(),
                reason: "bad metadata: split width is 0".into(),
            });
        }
        // Every chunk holds at least one character.
        if meta.chunks > self.limits.max_payload {
            return Err(StoreError::CorruptRecord {
                key: self.key.clone(),
                reason: format!(
                    "bad metadata: {} chunks exceeds payload limit {}",
                    meta.chunks, self.limits.max_payload
                ),
            });
        }
        Ok(Some(meta))
    }

    /// Encode, split and write `record`.
    ///
    /// On [`StoreError::SizeExceeded`] nothing is written. Chunks left over
    /// from an earlier, longer save are removed after the new chunks land.
    pub fn try_save(&self, record: &T) -> StoreResult<ChunkMeta> {
        let payload = serde_json::to_string(record)?;
        let len = payload.chars().count();
        if len > self.limits.max_payload {
            return Err(StoreError::SizeExceeded {
                key: self.key.clone(),
                len,
                limit: self.limits.max_payload,
            });
        }

        let previous = self.read_meta().unwrap_or(None);
        let chunks = split_chunks(&payload, self.limits.width);
        let meta = ChunkMeta {
            version: self.version.clone(),
            chunks: chunks.len(),
            size: self.limits.width,
        };

        let mut batch = Vec::with_capacity(chunks.len() + 1);
        batch.push((self.key.clone(), serde_json::to_string(&meta)?));
        for (i, chunk) in chunks.iter().enumerate() {
            batch.push((self.chunk_key(i), (*chunk).to_string()));
        }
        self.entries.set_entries(&batch)?;
        if let Some(previous) = previous {
            let stale: Vec<String> = (meta.chunks..previous.chunks)
                .map(|i| self.chunk_key(i))
                .collect();
            self.entries.remove_entries(&stale)?;
        }

        debug!(key = %self.key, chunks = meta.chunks, len, "record saved");
        Ok(meta)
    }

    /// Read, join and decode the record. `Ok(None)` on first load.
    pub fn try_load(&self) -> StoreResult<Option<(T, ChunkMeta)>> {
        let Some(meta) = self.read_meta()? else {
            return Ok(None);
        };

        let mut payload = String::new();
        for index in 0..meta.chunks {
            let chunk = self.entries.get_entry(&self.chunk_key(index))?;
            if chunk.is_empty() {
                return Err(StoreError::MissingChunk {
                    key: self.key.clone(),
                    index,
                });
            }
            payload.push_str(&chunk);
        }

        let record = serde_json::from_str(&payload).map_err(|e| StoreError::CorruptRecord {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        debug!(key = %self.key, chunks = meta.chunks, "record loaded");
        Ok(Some((record, meta)))
    }

    /// Save `record`, logging instead of failing.
    ///
    /// Returns `false` if nothing (or only part of the record) was written;
    /// the previously persisted record then remains authoritative.
    pub fn save(&self, record: &T) -> bool {
        match self.try_save(record) {
            Ok(_) => true,
            Err(e @ StoreError::SizeExceeded { .. }) => {
                error!(key = %self.key, error = %e, "record too large to save");
                false
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save record");
                false
            }
        }
    }

    /// Load the record, substituting `fallback` when it is absent or
    /// unreadable. The meta is `None` whenever the fallback is returned.
    pub fn load(&self, fallback: T) -> (T, Option<ChunkMeta>) {
        match self.try_load() {
            Ok(Some((record, meta))) => (record, Some(meta)),
            Ok(None) => (fallback, None),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to load record; using fallback");
                (fallback, None)
            }
        }
    }

    /// Remove the meta entry and every chunk entry of this record.
    ///
    /// Works from the key space rather than the meta entry, so corrupt
    /// records are cleared too. Returns the number of entries removed.
    pub fn clear(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for key in self.entries.keys_with_prefix(&format!("{}[", self.key))? {
            if self.entries.remove_entry(&key)? {
                removed += 1;
            }
        }
        if self.entries.remove_entry(&self.key)? {
            removed += 1;
        }
        debug!(key = %self.key, removed, "record cleared");
        Ok(removed)
    }

    /// Describe the persisted layout without decoding the payload.
    pub fn inspect(&self) -> StoreResult<Option<ChunkReport>> {
        let Some(meta) = self.read_meta()? else {
            return Ok(None);
        };
        let mut chunk_lengths = Vec::with_capacity(meta.chunks);
        for index in 0..meta.chunks {
            let chunk = self.entries.get_entry(&self.chunk_key(index))?;
            chunk_lengths.push((!chunk.is_empty()).then(|| chunk.chars().count()));
        }
        let prefix = format!("{}[", self.key);
        let stray_chunks = self
            .entries
            .keys_with_prefix(&prefix)?
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix)?.strip_suffix(']')?.parse::<usize>().ok())
            .filter(|index| *index >= meta.chunks)
            .count();
        Ok(Some(ChunkReport {
            meta,
            chunk_lengths,
            stray_chunks,
        }))
    }
}

impl<S: EntryStore + ?Sized, T> std::fmt::Debug for ChunkedStore<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedStore")
            .field("key", &self.key)
            .field("limits", &self.limits)
            .field("version", &self.version)
            .finish()
    }
}
