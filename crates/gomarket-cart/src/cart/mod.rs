//! Shopping cart module.
//!
//! Contains the line item types and the pure cart state transitions.

mod item;
mod state;

pub use item::{CartItem, NewCartItem};
pub use state::CartState;
