//! Shopping cart state for the GoMarket storefront.
//!
//! This crate owns the cart for one application session:
//!
//! - **Cart**: line items and the pure add / increment / decrement transitions
//! - **Store**: the session's [`CartStore`], mirrored to a key-value adapter
//!   after every mutation and rehydrated from it at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_cart::prelude::*;
//! use gomarket_storage::MemoryStore;
//!
//! let cart = CartStore::open(Arc::new(MemoryStore::new()), &CartConfig::default()).await?;
//!
//! cart.add_to_cart(NewCartItem::new("p1", "Shoe", "https://img/p1.png", 10.0))?;
//! cart.add_to_cart(NewCartItem::new("p1", "Shoe", "https://img/p1.png", 10.0))?;
//! cart.decrement(&ProductId::new("p1"))?.persisted().await?;
//!
//! assert_eq!(cart.products()?[0].quantity, 1);
//! ```

pub mod config;
pub mod error;
pub mod ids;

pub mod cart;
pub mod store;

pub use config::CartConfig;
pub use error::CartError;
pub use ids::ProductId;
pub use store::{CartStore, PendingWrite};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartItem, CartState, NewCartItem};
    pub use crate::config::CartConfig;
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::store::{CartStore, PendingWrite};
}
