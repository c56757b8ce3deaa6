//! # Cart
//!
//! Shopping cart for the storefront. The cart is a plain serde value,
//! callers persist it wherever they keep client state.

use crate::error::{StoreError, StoreResult};
use crate::product::{Currency, Price, Product};
use serde::{Deserialize, Serialize};

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID
    pub product_id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line from a product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price.clone(),
            quantity,
        }
    }

    /// Calculate the total price for this line
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Cart contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Currency (must be same for all items)
    pub currency: Currency,

    /// Lines, in insertion order
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
        }
    }

    /// Add a product. An existing line for the same product has its
    /// quantity increased; a quantity of 0 counts as 1.
    pub fn add(&mut self, product: &Product, quantity: u32) -> StoreResult<()> {
        if product.price.currency != self.currency {
            return Err(StoreError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: product.price.currency.to_string(),
            });
        }

        let quantity = quantity.max(1);
        match self.item_mut(&product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        Ok(())
    }

    /// Remove a product's line, returning it if present
    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Set a line's quantity. Zero removes the line.
    /// Returns false when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.item_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Bump a line's quantity by one
    pub fn increment(&mut self, product_id: &str) -> bool {
        match self.item_mut(product_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Lower a line's quantity by one, never below 1
    pub fn decrement(&mut self, product_id: &str) -> bool {
        match self.item_mut(product_id) {
            Some(item) => {
                if item.quantity > 1 {
                    item.quantity -= 1;
                }
                true
            }
            None => false,
        }
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Find a line by product ID
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Sum of all line totals
    pub fn total_price(&self) -> Price {
        let amount = self.items.iter().map(|item| item.total().amount).sum();
        Price::from_cents(amount, self.currency)
    }

    /// Sum of all quantities
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn butler() -> Product {
        Product::new("couch-butler", "Couch Butler", Price::new(409.99, Currency::PLN))
    }

    #[test]
    fn test_add_merges_quantity() {
        let mut cart = Cart::new(Currency::PLN);
        cart.add(&butler(), 1).unwrap();
        cart.add(&butler(), 2).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price().amount, 122997);
    }

    #[test]
    fn test_add_zero_counts_as_one() {
        let mut cart = Cart::new(Currency::PLN);
        cart.add(&butler(), 0).unwrap();
        assert_eq!(cart.get("couch-butler").unwrap().quantity, 1);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::new(Currency::EUR);
        let err = cart.add(&butler(), 1).unwrap_err();
        assert!(matches!(err, StoreError::CurrencyMismatch { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut cart = Cart::new(Currency::PLN);
        let cover = Product::new("cover", "Spare Cover", Price::new(49.0, Currency::PLN));
        cart.add(&butler(), 1).unwrap();
        cart.add(&cover, 1).unwrap();

        assert!(cart.update_quantity("cover", 4));
        assert_eq!(cart.total_items(), 5);

        assert!(cart.update_quantity("cover", 0));
        assert!(cart.get("cover").is_none());
        assert!(!cart.update_quantity("cover", 2));

        assert_eq!(cart.remove("couch-butler").map(|i| i.quantity), Some(1));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::zero(Currency::PLN));
    }

    #[test]
    fn test_increment_decrement_floor() {
        let mut cart = Cart::new(Currency::PLN);
        cart.add(&butler(), 1).unwrap();

        assert!(cart.decrement("couch-butler"));
        assert_eq!(cart.total_items(), 1);

        assert!(cart.increment("couch-butler"));
        assert!(cart.increment("couch-butler"));
        assert!(cart.decrement("couch-butler"));
        assert_eq!(cart.total_items(), 2);

        assert!(!cart.increment("missing"));
    }

    #[test]
    fn test_cart_json_shape() {
        let mut cart = Cart::new(Currency::PLN);
        cart.add(&butler(), 2).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);

        let empty: Cart = serde_json::from_str(r#"{"currency":"pln"}"#).unwrap();
        assert!(empty.is_empty());

        cart.clear();
        assert_eq!(cart.total_items(), 0);
    }
}
