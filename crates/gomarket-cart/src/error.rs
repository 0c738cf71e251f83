//! Cart error types.

use gomarket_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the cart store.
///
/// Unknown product ids are never errors: `increment` and `decrement` treat
/// them as no-ops.
#[derive(Error, Debug)]
pub enum CartError {
    /// Stored bytes do not parse as a valid cart.
    #[error("Failed to decode stored cart: {0}")]
    Decode(String),

    /// An item descriptor cannot be stored, e.g. a non-finite price.
    #[error("Invalid cart item {id}: {reason}")]
    InvalidItem { id: String, reason: String },

    /// The cart could not be serialized for storage.
    #[error("Failed to encode cart: {0}")]
    Encode(String),

    /// The adapter refused a write. The in-memory cart keeps the mutation.
    #[error("Failed to persist cart: {0}")]
    PersistenceWrite(#[source] StorageError),

    /// The adapter failed while reading the stored cart.
    #[error("Failed to read stored cart: {0}")]
    PersistenceRead(#[source] StorageError),

    /// The cart was used after its store was closed.
    #[error("Cart store is not initialized")]
    NotInitialized,
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Decode(e.to_string())
    }
}
