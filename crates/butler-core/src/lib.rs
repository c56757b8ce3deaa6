//! # butler-core
//!
//! Core types for the couch-butler storefront.
//!
//! This crate provides:
//! - Card input formatting and validation (`card`): grouping, network
//!   detection, Luhn, expiry
//! - Phone keystroke filtering and formatting (`phone`)
//! - `Product`, `ProductCatalog`, `Cart` and `OrderRequest`
//! - The `Storefront` trait for product/order backends
//! - `CardError` and `StoreError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use butler_core::{card, CardForm, Cart, Currency, Customer, OrderRequest};
//!
//! // On each keystroke
//! let shown = card::format_card_number("41111111");   // "4111 1111"
//! let logo = card::classify_network(&shown);         // Some(Visa)
//!
//! // On submit
//! let summary = CardForm::new(number, expiry, cvc, name).validate_now()?;
//! let order = OrderRequest::from_cart(&cart, customer)?.with_card(summary);
//! let receipt = storefront.create_order(&order).await?;
//! ```

pub mod card;
pub mod cart;
pub mod error;
pub mod order;
pub mod phone;
pub mod product;
pub mod storefront;

// Re-exports for convenience
pub use card::{
    classify_network, format_card_number, format_expiry, is_luhn_valid, mask_card_number,
    validate_card_number,
    validate_expiry, validate_expiry_now, CardForm, CardNetwork, CardSummary, Expiry,
};
pub use cart::{Cart, CartItem};
pub use error::{CardError, StoreError, StoreResult};
pub use order::{
    Customer, DeliveryMethod, OrderReceipt, OrderRequest, OrderStatus, PaymentMethod,
};
pub use phone::{format_phone, is_phone_char};
pub use product::{Currency, Price, Product, ProductCatalog};
pub use storefront::{BoxedStorefront, OfflineStorefront, Storefront};
