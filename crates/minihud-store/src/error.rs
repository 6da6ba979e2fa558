/// Errors from entry-store and chunk codec operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The encoded record is larger than the chunking ceiling allows.
    #[error("record {key} too large to save: {len} characters exceeds limit of {limit}")]
    SizeExceeded {
        key: String,
        len: usize,
        limit: usize,
    },

    /// The metadata entry or the joined payload could not be decoded.
    #[error("corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// An indexed chunk named by the metadata entry is absent.
    #[error("record {key} is missing chunk {index}")]
    MissingChunk { key: String, index: usize },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend lock was poisoned by a panicking writer.
    #[error("entry store lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
