//! The key-value adapter contract.

use async_trait::async_trait;

use crate::StorageError;

/// Opaque key-value byte store used to survive process restarts.
///
/// Implementations need not coordinate concurrent writers: the last `set`
/// observed by the backend wins.
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.set("@GoMarketPlace:products", b"[]".to_vec()).await?;
/// let bytes = store.get("@GoMarketPlace:products").await?;
/// ```
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Remove every key in the store, not just one namespace.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Helper to build storage keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = gomarket_storage::storage_key!("@GoMarketPlace", "products");
/// assert_eq!(key, "@GoMarketPlace:products");
/// ```
#[macro_export]
macro_rules! storage_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
