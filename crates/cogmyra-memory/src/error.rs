//! Error types for memory operations.

/// Errors returned by the memory store and its JSONL helpers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Reading or writing the backing file failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
