//! Key-value persistence adapters for the GoMarket cart.
//!
//! The cart treats its storage engine as an opaque byte store with three
//! operations: `get`, `set` and `clear`. This crate defines that contract and
//! ships two implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_storage::{FileStore, Store, storage_key};
//!
//! let store = FileStore::open(".gomarket/store.json");
//! let key = storage_key!("@GoMarketPlace", "products");
//!
//! store.set(&key, b"[]".to_vec()).await?;
//! let bytes: Option<Vec<u8>> = store.get(&key).await?;
//!
//! // Wipes every key, not just the cart's
//! store.clear().await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::Store;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{storage_key, FileStore, MemoryStore, StorageError, Store};
}
