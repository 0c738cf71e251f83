//! Storage error types.

use thiserror::Error;

/// Errors that can occur when talking to a persistence adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file or device I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The on-disk index could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value was not valid base64.
    #[error("Invalid stored value for key {key}: {reason}")]
    Encoding { key: String, reason: String },

    /// The backend refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
