//! Line item types.

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::ids::ProductId;

/// One distinct product in the cart.
///
/// Field order matches the persisted layout: id, title, imageUrl, price,
/// quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image.
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: String,
    /// Unit price in currency units.
    pub price: f64,
    /// How many of this product are in the cart.
    pub quantity: u32,
}

/// Descriptor passed to `add_to_cart`: a [`CartItem`] without a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    /// Create a new descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Check the descriptor can be persisted and read back.
    ///
    /// JSON has no representation for NaN or infinity, so such prices are
    /// rejected before they reach the cart.
    pub fn validate(&self) -> Result<(), CartError> {
        if !self.price.is_finite() {
            return Err(CartError::InvalidItem {
                id: self.id.to_string(),
                reason: format!("price must be finite, got {}", self.price),
            });
        }
        Ok(())
    }

    /// Turn the descriptor into a line with the given quantity.
    pub fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_field_order() {
        let item = NewCartItem::new("p1", "Shoe", "u", 10.0).with_quantity(1);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"p1","title":"Shoe","imageUrl":"u","price":10.0,"quantity":1}"#
        );
    }

    #[test]
    fn test_legacy_image_url_key() {
        let json = r#"{"id":"p1","title":"Shoe","image_url":"u","price":10,"quantity":3}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image_url, "u");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_validate_rejects_non_finite_price() {
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = NewCartItem::new("p1", "Shoe", "u", price).validate().unwrap_err();
            assert!(matches!(err, CartError::InvalidItem { .. }));
        }
        assert!(NewCartItem::new("p1", "Shoe", "u", 0.0).validate().is_ok());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let json = r#"{"id":"p1","title":"Shoe","imageUrl":"u","price":10,"quantity":-1}"#;
        assert!(serde_json::from_str::<CartItem>(json).is_err());
    }
}
