//! Backend JSON shapes and their conversion into core types.

use butler_core::order::{deserialize_id, deserialize_opt_id};
use butler_core::{Currency, Price, Product};
use serde::{Deserialize, Serialize};

/// List responses wrap their payload in `data`
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WirePrice {
    pub current: f64,
    #[serde(default)]
    pub old: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireProduct {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: WirePrice,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl WireProduct {
    pub(crate) fn into_product(self) -> Product {
        let WireProduct {
            id,
            sku,
            name,
            description,
            image,
            price,
            active,
        } = self;
        let currency = price
            .currency
            .as_deref()
            .and_then(Currency::parse)
            .unwrap_or_default();

        let mut product = Product::new(id, name, Price::new(price.current, currency));
        product.sku = sku;
        product.description = description.unwrap_or_default();
        product.image_url = image;
        product.old_price = price.old.map(|old| Price::new(old, currency));
        product.active = active;
        product
    }
}

/// Body for creating or replacing a product, the write side of [`WireProduct`]
#[derive(Debug, Serialize)]
pub(crate) struct WireProductBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<&'a str>,
    pub name: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
    pub price: WritePrice,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct WritePrice {
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<f64>,
    pub currency: &'static str,
}

impl<'a> WireProductBody<'a> {
    pub(crate) fn from_product(product: &'a Product) -> Self {
        Self {
            sku: product.sku.as_deref(),
            name: &product.name,
            description: &product.description,
            image: product.image_url.as_deref(),
            price: WritePrice {
                current: product.price.as_decimal(),
                old: product.old_price.as_ref().map(Price::as_decimal),
                currency: product.price.currency.as_str(),
            },
            active: product.active,
        }
    }
}

/// Credentials for `/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body for `/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Error body some backends return
#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(alias = "error")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_wire() {
        let wire: WireProduct = serde_json::from_str(
            r#"{
                "id": 7,
                "sku": "SNACK-001",
                "name": "Couch Butler",
                "image": "https://cdn.example/butler.png",
                "price": { "current": 409.99, "old": 829.99, "currency": "zł" }
            }"#,
        )
        .unwrap();
        let product = wire.into_product();

        assert_eq!(product.id, "7");
        assert_eq!(product.sku.as_deref(), Some("SNACK-001"));
        assert_eq!(product.price, Price::from_cents(40999, Currency::PLN));
        assert_eq!(product.old_price, Some(Price::from_cents(82999, Currency::PLN)));
        assert_eq!(product.image_url.as_deref(), Some("https://cdn.example/butler.png"));
        assert!(product.active);
    }

    #[test]
    fn test_document_store_id() {
        let wire: WireProduct = serde_json::from_str(
            r#"{ "_id": "65f0", "name": "X", "price": { "current": 409.99, "currency": "pln" } }"#,
        )
        .unwrap();
        assert_eq!(wire.into_product().id, "65f0");
    }

    #[test]
    fn test_unknown_currency_defaults() {
        let wire: WireProduct = serde_json::from_str(
            r#"{ "id": "x", "name": "X", "price": { "current": 1.5, "currency": "??" } }"#,
        )
        .unwrap();
        let product = wire.into_product();
        assert_eq!(product.price.currency, Currency::PLN);
        assert!(product.old_price.is_none());
    }

    #[test]
    fn test_product_write_body() {
        let product = Product::new("1", "Couch Butler", Price::from_cents(40999, Currency::PLN))
            .with_sku("SNACK-001")
            .with_old_price(Price::from_cents(82999, Currency::PLN));
        let body = serde_json::to_value(WireProductBody::from_product(&product)).unwrap();

        assert_eq!(body["sku"], "SNACK-001");
        assert_eq!(body["price"]["current"], 409.99);
        assert_eq!(body["price"]["old"], 829.99);
        assert_eq!(body["price"]["currency"], "pln");
        assert!(body.get("image").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_error_body_aliases() {
        let a: WireError = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        let b: WireError = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(a.message, b.message);
    }
}
