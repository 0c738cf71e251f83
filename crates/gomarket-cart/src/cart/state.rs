//! Cart state and its transitions.

use std::collections::HashSet;

use crate::cart::{CartItem, NewCartItem};
use crate::error::CartError;
use crate::ids::ProductId;

/// Ordered cart lines, unique by product id.
///
/// Insertion order is preserved; the first product added stays first. No
/// transition ever removes a line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from lines, rejecting duplicate ids.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CartError::Decode(format!("duplicate product id {}", item.id)));
            }
        }
        Ok(Self { items })
    }

    /// Add one unit of a product.
    ///
    /// Bumps the existing line's quantity, or appends a new line with
    /// quantity 1. Returns the line's resulting quantity. Descriptors that
    /// fail [`NewCartItem::validate`] leave the cart untouched.
    pub fn add(&mut self, item: NewCartItem) -> Result<u32, CartError> {
        item.validate()?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return Ok(existing.quantity);
        }

        self.items.push(item.with_quantity(1));
        Ok(1)
    }

    /// Raise a line's quantity by one.
    ///
    /// Returns the new quantity, or `None` when no line has this id.
    pub fn increment(&mut self, id: &ProductId) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.quantity = item.quantity.saturating_add(1);
        Some(item.quantity)
    }

    /// Lower a line's quantity by one, stopping at zero.
    ///
    /// The line stays in the cart at quantity 0. Returns the resulting
    /// quantity, or `None` when no line has this id.
    pub fn decrement(&mut self, id: &ProductId) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| &i.id == id)?;
        item.quantity = item.quantity.saturating_sub(1);
        Some(item.quantity)
    }

    /// All lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get a line by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Serialize for the persistence adapter.
    pub fn encode(&self) -> Result<Vec<u8>, CartError> {
        serde_json::to_vec(&self.items).map_err(|e| CartError::Encode(e.to_string()))
    }

    /// Parse bytes previously produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, CartError> {
        let items: Vec<CartItem> = serde_json::from_slice(bytes)?;
        Self::from_items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe() -> NewCartItem {
        NewCartItem::new("p1", "Shoe", "u", 10.0)
    }

    fn hat() -> NewCartItem {
        NewCartItem::new("p2", "Hat", "h", 25.5)
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = CartState::new();
        assert_eq!(cart.add(shoe()).unwrap(), 1);

        assert_eq!(cart.items(), &[shoe().with_quantity(1)]);
    }

    #[test]
    fn test_add_same_item_bumps_quantity() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        assert_eq!(cart.add(shoe()).unwrap(), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_existing_keeps_original_fields() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        cart.add(NewCartItem::new("p1", "Renamed", "other", 99.0)).unwrap();

        let line = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(line.title, "Shoe");
        assert_eq!(line.image_url, "u");
        assert_eq!(line.price, 10.0);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        cart.add(hat()).unwrap();
        cart.add(shoe()).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[test]
    fn test_increment_only_touches_target() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        cart.add(hat()).unwrap();

        assert_eq!(cart.increment(&ProductId::new("p2")), Some(2));
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[1].quantity, 2);
    }

    #[test]
    fn test_increment_unknown_is_noop() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        let before = cart.clone();

        assert_eq!(cart.increment(&ProductId::new("missing")), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_floors_at_zero_and_keeps_line() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();

        assert_eq!(cart.decrement(&ProductId::new("p1")), Some(0));
        assert_eq!(cart.decrement(&ProductId::new("p1")), Some(0));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 0);
    }

    #[test]
    fn test_increment_then_decrement_is_inverse() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        cart.add(shoe()).unwrap();
        cart.add(shoe()).unwrap();
        let id = ProductId::new("p1");

        cart.increment(&id);
        assert_eq!(cart.decrement(&id), Some(3));
    }

    #[test]
    fn test_decrement_unknown_is_noop() {
        let mut cart = CartState::new();
        assert_eq!(cart.decrement(&ProductId::new("p1")), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        cart.add(shoe()).unwrap();
        cart.add(hat()).unwrap();

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_encode_decode_preserves_order_and_fields() {
        let mut cart = CartState::new();
        cart.add(hat()).unwrap();
        cart.add(shoe()).unwrap();
        cart.add(shoe()).unwrap();
        cart.decrement(&ProductId::new("p2"));

        let decoded = CartState::decode(&cart.encode().unwrap()).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let json = br#"[
            {"id":"p1","title":"Shoe","imageUrl":"u","price":10,"quantity":1},
            {"id":"p1","title":"Shoe","imageUrl":"u","price":10,"quantity":2}
        ]"#;

        let err = CartState::decode(json).unwrap_err();
        assert!(matches!(err, CartError::Decode(_)));
    }

    #[test]
    fn test_add_rejects_nan_price_without_change() {
        let mut cart = CartState::new();
        cart.add(shoe()).unwrap();
        let before = cart.clone();

        let err = cart.add(NewCartItem::new("p9", "Ghost", "g", f64::NAN)).unwrap_err();
        assert!(matches!(err, CartError::InvalidItem { .. }));
        assert_eq!(cart, before);
        assert!(CartState::decode(&cart.encode().unwrap()).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            CartState::decode(b"not json"),
            Err(CartError::Decode(_))
        ));
    }
}
