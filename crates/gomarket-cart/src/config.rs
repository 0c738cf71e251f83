//! Cart configuration.

use gomarket_storage::storage_key;
use serde::{Deserialize, Serialize};

/// Settings for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key used for every read and write of the cart.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

/// The cart's storage key unless configured otherwise.
pub fn default_storage_key() -> String {
    storage_key!("@GoMarketPlace", "products")
}
