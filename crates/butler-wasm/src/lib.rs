//! # butler-wasm
//!
//! WebAssembly bindings for couch-butler.
//!
//! This crate exposes the card form helpers to the browser so the payment
//! form can format and validate on every keystroke without a round trip:
//! - Card number / expiry formatting and network detection
//! - Luhn and expiry validation (returning error code tags)
//! - Phone formatting
//! - Cart totals
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { format_card_number, card_network, validate_expiry } from 'couch-butler-wasm';
//!
//! await init();
//!
//! input.value = format_card_number(input.value);   // "4111 1111 1111 1111"
//! logo.src = `/logos/${card_network(input.value) ?? 'none'}.svg`;
//!
//! try { validate_expiry(expiry.value); }
//! catch (code) { showError(messages[code]); }     // e.g. "expired_card"
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use butler_core::{card, phone, CardError, Price, Currency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Cart item for WASM interface
#[derive(Debug, Serialize, Deserialize)]
#[wasm_bindgen]
pub struct WasmCartItem {
    product_id: String,
    name: String,
    price_cents: i64,
    quantity: u32,
}

#[wasm_bindgen]
impl WasmCartItem {
    #[wasm_bindgen(constructor)]
    pub fn new(product_id: String, name: String, price_cents: i64, quantity: u32) -> Self {
        Self {
            product_id,
            name,
            price_cents,
            quantity,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn product_id(&self) -> String {
        self.product_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    #[wasm_bindgen(getter)]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total in grosze
    #[wasm_bindgen]
    pub fn total_cents(&self) -> i64 {
        self.price_cents * i64::from(self.quantity)
    }

    /// Line total for display
    #[wasm_bindgen]
    pub fn format_total(&self) -> String {
        format_price(self.total_cents())
    }
}

/// Card state for the form after a keystroke
#[wasm_bindgen]
pub struct CardCheck {
    formatted: String,
    network: Option<String>,
    error: Option<String>,
}

#[wasm_bindgen]
impl CardCheck {
    /// Number as it should be redisplayed
    #[wasm_bindgen(getter)]
    pub fn formatted(&self) -> String {
        self.formatted.clone()
    }

    /// Network tag, `undefined` when unknown
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> Option<String> {
        self.network.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn valid(&self) -> bool {
        self.error.is_none()
    }

    /// Error code tag, `undefined` when valid
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

/// Format, classify and validate a card number in one call
#[wasm_bindgen]
pub fn check_card_number(raw: &str) -> CardCheck {
    let formatted = card::format_card_number(raw);
    CardCheck {
        network: card::classify_network(&formatted).map(|n| n.as_str().to_string()),
        error: card::validate_card_number(&formatted)
            .err()
            .map(|e| e.code().to_string()),
        formatted,
    }
}

/// Group card digits in blocks of 4
#[wasm_bindgen]
pub fn format_card_number(raw: &str) -> String {
    card::format_card_number(raw)
}

/// Network tag for the logo, `undefined` when unknown
#[wasm_bindgen]
pub fn card_network(number: &str) -> Option<String> {
    card::classify_network(number).map(|n| n.as_str().to_string())
}

#[wasm_bindgen]
pub fn is_luhn_valid(digits: &str) -> bool {
    card::is_luhn_valid(digits)
}

/// Throws the error code when the number is rejected
#[wasm_bindgen]
pub fn validate_card_number(number: &str) -> Result<(), JsValue> {
    card::validate_card_number(number).map_err(to_js)
}

#[wasm_bindgen]
pub fn format_expiry(raw: &str) -> String {
    card::format_expiry(raw)
}

/// Validate `MM/YY` against the browser's current date.
/// Throws the error code on failure.
#[wasm_bindgen]
pub fn validate_expiry(expiry: &str) -> Result<(), JsValue> {
    let now = js_sys::Date::new_0();
    let year = now.get_full_year() as i32;
    let month = now.get_month() + 1;
    expiry_check(expiry, year, month).map_err(to_js)
}

#[wasm_bindgen]
pub fn format_phone(raw: &str) -> String {
    phone::format_phone(raw)
}

/// Keystroke filter for the phone field
#[wasm_bindgen]
pub fn is_phone_char(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if phone::is_phone_char(c))
}

/// Calculate total for a list of cart items
#[wasm_bindgen]
pub fn calculate_cart_total(items: JsValue) -> Result<i64, JsValue> {
    let items: Vec<WasmCartItem> = serde_wasm_bindgen::from_value(items)
        .map_err(|e| JsValue::from_str(&format!("Invalid cart items: {}", e)))?;

    Ok(cart_total(&items))
}

/// Format grosze as a zloty display string
#[wasm_bindgen]
pub fn format_price(cents: i64) -> String {
    Price::from_cents(cents, Currency::PLN).display()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn cart_total(items: &[WasmCartItem]) -> i64 {
    items.iter().map(WasmCartItem::total_cents).sum()
}

fn expiry_check(expiry: &str, year: i32, month: u32) -> Result<(), CardError> {
    // Day 1 of the current month, only year and month matter
    let today = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CardError::InvalidExpiryFormat)?;
    card::validate_expiry(expiry, today).map(|_| ())
}

fn to_js(err: CardError) -> JsValue {
    JsValue::from_str(err.code())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn validate_expiry_uses_browser_clock() {
        let code = |expiry: &str| validate_expiry(expiry).err().and_then(|e| e.as_string());
        assert_eq!(code("01/20").as_deref(), Some("expired_card"));
        assert_eq!(code("13/99").as_deref(), Some("invalid_expiry_month"));
        assert_eq!(code("12/99"), None);
    }
}
