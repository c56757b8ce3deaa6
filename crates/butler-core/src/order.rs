//! # Order Types
//!
//! Customer details and the order request sent to the backend.
//! Card payments attach only a redacted [`CardSummary`].

use crate::card::CardSummary;
use crate::cart::{Cart, CartItem};
use crate::error::{StoreError, StoreResult};
use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialize an ID the backend may send as `"42"` or `42`
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// [`deserialize_id`] for optional fields
pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "deserialize_id")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

fn default_country() -> String {
    "Poland".to_string()
}

/// Shipping and contact details from the order form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Street and house number
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub building: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub apartment: String,
    pub city: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            building: String::new(),
            apartment: String::new(),
            city: String::new(),
            zip_code: String::new(),
            country: default_country(),
            notes: String::new(),
        }
    }
}

impl Customer {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Check the fields the order form marks as required
    pub fn validate(&self) -> StoreResult<()> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("zip_code", &self.zip_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidRequest(format!("{} is required", field)));
            }
        }

        if !self.email.contains('@') {
            return Err(StoreError::InvalidRequest(format!(
                "email is not valid: {}",
                self.email
            )));
        }

        // A lone "+" is the form's initial value
        if !self.phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(StoreError::InvalidRequest("phone is required".to_string()));
        }

        Ok(())
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Card,
    CashOnDelivery,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::BankTransfer
    }
}

/// How the order is shipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Courier,
    Pickup,
}

impl Default for DeliveryMethod {
    fn default() -> Self {
        DeliveryMethod::Courier
    }
}

/// An order to be submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Unique order ID (generated)
    pub id: String,

    /// Idempotency key (prevents duplicate orders on resubmit)
    pub idempotency_key: String,

    /// Lines copied from the cart
    pub items: Vec<CartItem>,

    /// Order total
    pub total: Price,

    /// Contact and shipping details
    pub customer: Customer,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub delivery_method: DeliveryMethod,

    /// Redacted card details when paying by card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSummary>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl OrderRequest {
    /// Build an order from the cart and validated customer details
    pub fn from_cart(cart: &Cart, customer: Customer) -> StoreResult<Self> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        customer.validate()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            idempotency_key: Uuid::new_v4().to_string(),
            items: cart.items.clone(),
            total: cart.total_price(),
            customer,
            payment_method: PaymentMethod::default(),
            delivery_method: DeliveryMethod::default(),
            card: None,
            created_at: Utc::now(),
        })
    }

    /// Pay by card, attaching the redacted summary
    pub fn with_card(mut self, summary: CardSummary) -> Self {
        self.payment_method = PaymentMethod::Card;
        self.card = Some(summary);
        self
    }

    /// Builder: set payment method
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        if method != PaymentMethod::Card {
            self.card = None;
        }
        self.payment_method = method;
        self
    }

    /// Builder: set delivery method
    pub fn with_delivery_method(mut self, method: DeliveryMethod) -> Self {
        self.delivery_method = method;
        self
    }

    /// Builder: set idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = key.into();
        self
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Status of an order on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    /// Status the client does not know about (passthrough)
    #[serde(untagged)]
    Other(String),
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// Order as acknowledged by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Backend order ID, `_id` on document-store backends
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub status: OrderStatus,

    /// Total as recorded by the backend, when it reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardForm;
    use crate::product::{Currency, Product};
    use chrono::NaiveDate;

    fn customer() -> Customer {
        Customer {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            email: "jan@example.com".into(),
            phone: "+48 123 456 789".into(),
            address: "ul. Długa 5".into(),
            city: "Gdańsk".into(),
            zip_code: "80-831".into(),
            ..Customer::default()
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new(Currency::PLN);
        let product = Product::new("couch-butler", "Couch Butler", Price::new(409.99, Currency::PLN));
        cart.add(&product, 2).unwrap();
        cart
    }

    #[test]
    fn test_customer_validation() {
        assert!(customer().validate().is_ok());
        assert_eq!(customer().full_name(), "Jan Kowalski");
        assert_eq!(customer().country, "Poland");

        let missing_city = Customer {
            city: "  ".into(),
            ..customer()
        };
        let err = missing_city.validate().unwrap_err();
        assert!(err.to_string().contains("city"));

        let bad_email = Customer {
            email: "jan.example.com".into(),
            ..customer()
        };
        assert!(bad_email.validate().is_err());

        let bare_plus = Customer {
            phone: "+".into(),
            ..customer()
        };
        assert!(bare_plus.validate().is_err());
    }

    #[test]
    fn test_order_from_cart() {
        let order = OrderRequest::from_cart(&cart(), customer()).unwrap();
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total.amount, 81998);
        assert_eq!(order.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(order.delivery_method, DeliveryMethod::Courier);
        assert_ne!(order.id, order.idempotency_key);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = OrderRequest::from_cart(&Cart::new(Currency::PLN), customer()).unwrap_err();
        assert!(matches!(err, StoreError::EmptyCart));
    }

    #[test]
    fn test_card_order_is_redacted() {
        let summary = CardForm::new("4111111111111111", "1230", "123", "Jan Kowalski")
            .validate(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .unwrap();
        let order = OrderRequest::from_cart(&cart(), customer())
            .unwrap()
            .with_card(summary);
        assert_eq!(order.payment_method, PaymentMethod::Card);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["payment_method"], "card");
        assert_eq!(json["card"]["last4"], "1111");
        assert!(!json.to_string().contains("4111111111111111"));

        let switched = order.with_payment_method(PaymentMethod::BankTransfer);
        assert!(switched.card.is_none());
    }

    #[test]
    fn test_receipt_unknown_status() {
        let receipt: OrderReceipt =
            serde_json::from_str(r#"{"id":"42","status":"awaiting_stock"}"#).unwrap();
        assert_eq!(receipt.status, OrderStatus::Other("awaiting_stock".into()));

        let receipt: OrderReceipt = serde_json::from_str(r#"{"id":"43","status":"paid"}"#).unwrap();
        assert_eq!(receipt.status, OrderStatus::Paid);

        let bare: OrderReceipt = serde_json::from_str(r#"{"id":44}"#).unwrap();
        assert_eq!(bare.status, OrderStatus::Pending);
        assert_eq!(bare.id, "44");
    }

    #[test]
    fn test_receipt_document_store_id() {
        let receipt: OrderReceipt =
            serde_json::from_str(r#"{"_id":"65f0a1","status":"shipped"}"#).unwrap();
        assert_eq!(receipt.id, "65f0a1");
        assert_eq!(receipt.status, OrderStatus::Shipped);
    }
}
