//! In-process store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{Store, StorageError};

/// Volatile store backed by a `HashMap`.
///
/// Useful for tests and for sessions that do not need to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.data.write().clear();
        Ok(())
    }
}
