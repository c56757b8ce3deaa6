//! # Error Types
//!
//! Typed errors for couch-butler.
//! Card validation returns `Result<T, CardError>`, everything that touches
//! the catalog, cart, orders or the backend API returns `Result<T, StoreError>`.

use thiserror::Error;

/// Validation outcome for card input.
///
/// These are expected results of user typing, shown inline next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    /// Not 16 digits, or the Luhn checksum fails
    #[error("Invalid card number")]
    InvalidCardNumber,

    /// Expiry is not in `MM/YY` shape
    #[error("Invalid expiry date, expected MM/YY")]
    InvalidExpiryFormat,

    /// Month outside 01..=12
    #[error("Invalid expiry month")]
    InvalidExpiryMonth,

    /// Expiry month lies before the current month
    #[error("Card expired")]
    ExpiredCard,

    /// Cardholder name left blank
    #[error("Cardholder name is required")]
    MissingCardholderName,

    /// CVC is not 3 or 4 digits
    #[error("Invalid security code")]
    InvalidCvc,
}

impl CardError {
    /// Stable tag for UI layers to key translations on
    pub fn code(&self) -> &'static str {
        match self {
            CardError::InvalidCardNumber => "invalid_card_number",
            CardError::InvalidExpiryFormat => "invalid_expiry_format",
            CardError::InvalidExpiryMonth => "invalid_expiry_month",
            CardError::ExpiredCard => "expired_card",
            CardError::MissingCardholderName => "missing_cardholder_name",
            CardError::InvalidCvc => "invalid_cvc",
        }
    }

    /// Whether this error belongs to the expiry field
    pub fn is_expiry_error(&self) -> bool {
        matches!(
            self,
            CardError::InvalidExpiryFormat | CardError::InvalidExpiryMonth | CardError::ExpiredCard
        )
    }
}

/// Core error type for storefront operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration errors (bad URL, unparsable value)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Cart and product disagree on currency
    #[error("Currency mismatch: cart is {expected}, product is {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Checkout attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Backend rejected the credentials or token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend answered with a non-success status
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Network/HTTP error talking to the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) => true,
            StoreError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Configuration(_) => 500,
            StoreError::InvalidRequest(_) => 400,
            StoreError::ProductNotFound { .. } => 404,
            StoreError::CurrencyMismatch { .. } => 400,
            StoreError::EmptyCart => 400,
            StoreError::Unauthorized(_) => 401,
            StoreError::Api { status, .. } => *status,
            StoreError::Network(_) => 503,
            StoreError::Serialization(_) => 500,
            StoreError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type StoreResult<T> = Result<T, StoreError>;
