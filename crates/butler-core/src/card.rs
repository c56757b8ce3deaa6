//! # Card Input
//!
//! Formatting and validation for the card payment form.
//!
//! Every function here is a pure function of its input (plus today's date for
//! the expiry check), so a UI layer can call them on each keystroke or blur
//! and render the returned [`CardError`] inline.
//!
//! ```text
//!  keystrokes ──► format_card_number ──► "4111 1111 1111 1111"
//!                 classify_network   ──► Some(Visa)
//!                 validate_card_number (16 digits + Luhn)
//!
//!  keystrokes ──► format_expiry      ──► "12/25"
//!                 validate_expiry(today)
//! ```
//!
//! Raw card data stays inside [`CardForm`]. The only serializable output is
//! the redacted [`CardSummary`].

use crate::error::CardError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of digits accepted in the card number field
pub const MAX_CARD_DIGITS: usize = 16;

/// Digits per display block
const BLOCK_SIZE: usize = 4;

/// Maximum raw digits in the expiry field (MMYY)
const MAX_EXPIRY_DIGITS: usize = 4;

/// Card network, derived from the leading digits of the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Jcb,
    UnionPay,
}

impl CardNetwork {
    /// Lowercase tag used on the wire and for logo lookup
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "visa",
            CardNetwork::Mastercard => "mastercard",
            CardNetwork::Amex => "amex",
            CardNetwork::Jcb => "jcb",
            CardNetwork::UnionPay => "unionpay",
        }
    }

    /// Human readable brand name
    pub fn display_name(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "Visa",
            CardNetwork::Mastercard => "Mastercard",
            CardNetwork::Amex => "American Express",
            CardNetwork::Jcb => "JCB",
            CardNetwork::UnionPay => "UnionPay",
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip everything but digits, keep at most 16 and group them in blocks of 4.
///
/// Total and idempotent: `format_card_number(&format_card_number(s)) == format_card_number(s)`.
pub fn format_card_number(raw: &str) -> String {
    let mut formatted = String::with_capacity(MAX_CARD_DIGITS + MAX_CARD_DIGITS / BLOCK_SIZE);
    for (i, digit) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_CARD_DIGITS)
        .enumerate()
    {
        if i > 0 && i % BLOCK_SIZE == 0 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }
    formatted
}

/// Classify the card network from its prefix.
///
/// Whitespace is ignored. Prefixes are tested in a fixed order and the
/// first match wins; `None` means no logo should be shown.
pub fn classify_network(card_number: &str) -> Option<CardNetwork> {
    let compact = strip_whitespace(card_number);
    let bytes = compact.as_bytes();

    if bytes.first() == Some(&b'4') {
        return Some(CardNetwork::Visa);
    }

    let prefix = match bytes {
        [a, b, ..] if a.is_ascii_digit() && b.is_ascii_digit() => (a - b'0') * 10 + (b - b'0'),
        _ => return None,
    };

    match prefix {
        51..=55 | 22..=27 => Some(CardNetwork::Mastercard),
        34 | 37 => Some(CardNetwork::Amex),
        35 => Some(CardNetwork::Jcb),
        62 => Some(CardNetwork::UnionPay),
        _ => None,
    }
}

/// Luhn checksum over a digit-only string.
///
/// Any non-digit character, or an empty string, is invalid.
pub fn is_luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// A card number is accepted when it has exactly 16 digits and passes Luhn.
pub fn validate_card_number(number: &str) -> Result<(), CardError> {
    let compact = strip_whitespace(number);
    let well_formed =
        compact.len() == MAX_CARD_DIGITS && compact.bytes().all(|b| b.is_ascii_digit());

    if well_formed && is_luhn_valid(&compact) {
        Ok(())
    } else {
        Err(CardError::InvalidCardNumber)
    }
}

/// Format raw expiry keystrokes as `MM/YY`.
///
/// The slash only appears once a third digit is typed, so `"13"` stays `"13"`.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_EXPIRY_DIGITS)
        .collect();

    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Card expiry month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expiry {
    /// Full year (2000 + YY)
    pub year: i32,
    /// Month, 1..=12
    pub month: u32,
}

impl Expiry {
    /// Parse a `MM/YY` string, checking shape and month range only
    pub fn parse(expiry: &str) -> Result<Self, CardError> {
        let [m1, m2, b'/', y1, y2] = expiry.as_bytes() else {
            return Err(CardError::InvalidExpiryFormat);
        };
        if ![m1, m2, y1, y2].iter().all(|b| b.is_ascii_digit()) {
            return Err(CardError::InvalidExpiryFormat);
        }

        let month = u32::from((m1 - b'0') * 10 + (m2 - b'0'));
        let year = 2000 + i32::from((y1 - b'0') * 10 + (y2 - b'0'));

        if !(1..=12).contains(&month) {
            return Err(CardError::InvalidExpiryMonth);
        }

        Ok(Self { year, month })
    }

    /// True when the expiry month lies strictly before the month of `today`.
    /// A card stays valid through its whole expiry month.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

impl From<Expiry> for String {
    fn from(expiry: Expiry) -> Self {
        expiry.to_string()
    }
}

impl TryFrom<String> for Expiry {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Expiry::parse(&value)
    }
}

/// Validate a `MM/YY` expiry against `today`.
pub fn validate_expiry(expiry: &str, today: NaiveDate) -> Result<Expiry, CardError> {
    let parsed = Expiry::parse(expiry)?;
    if parsed.is_expired_on(today) {
        return Err(CardError::ExpiredCard);
    }
    Ok(parsed)
}

/// [`validate_expiry`] against the local wall-clock date
pub fn validate_expiry_now(expiry: &str) -> Result<Expiry, CardError> {
    validate_expiry(expiry, Local::now().date_naive())
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The card fields as typed into the payment form.
///
/// Setters apply the same normalization the form applies on change.
/// Not serializable, and `Debug` never prints the number or CVC.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    number: String,
    expiry: String,
    cvc: String,
    cardholder_name: String,
}

impl CardForm {
    pub fn new(
        number: &str,
        expiry: &str,
        cvc: &str,
        cardholder_name: impl Into<String>,
    ) -> Self {
        let mut form = Self::default();
        form.set_number(number);
        form.set_expiry(expiry);
        form.set_cvc(cvc);
        form.cardholder_name = cardholder_name.into();
        form
    }

    /// Replace the number with the formatted form of `raw`
    pub fn set_number(&mut self, raw: &str) {
        self.number = format_card_number(raw);
    }

    /// Replace the expiry with the formatted form of `raw`
    pub fn set_expiry(&mut self, raw: &str) {
        self.expiry = format_expiry(raw);
    }

    /// Keep up to 4 digits of `raw`
    pub fn set_cvc(&mut self, raw: &str) {
        self.cvc = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    }

    pub fn set_cardholder_name(&mut self, name: impl Into<String>) {
        self.cardholder_name = name.into();
    }

    /// Formatted number as displayed in the field
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cardholder_name(&self) -> &str {
        &self.cardholder_name
    }

    /// Network for the logo next to the number field
    pub fn network(&self) -> Option<CardNetwork> {
        classify_network(&self.number)
    }

    /// Validate every field in form order and return the redacted summary.
    ///
    /// The first failing field wins: number, expiry, cardholder name, CVC.
    pub fn validate(&self, today: NaiveDate) -> Result<CardSummary, CardError> {
        validate_card_number(&self.number)?;
        let expiry = validate_expiry(&self.expiry, today)?;

        let name = self.cardholder_name.trim();
        if name.is_empty() {
            return Err(CardError::MissingCardholderName);
        }

        if !(3..=4).contains(&self.cvc.len()) {
            return Err(CardError::InvalidCvc);
        }

        let compact = strip_whitespace(&self.number);
        Ok(CardSummary {
            network: classify_network(&compact),
            last4: compact[compact.len() - BLOCK_SIZE..].to_string(),
            expiry,
            cardholder_name: name.to_string(),
        })
    }

    /// [`CardForm::validate`] against the local wall-clock date
    pub fn validate_now(&self) -> Result<CardSummary, CardError> {
        self.validate(Local::now().date_naive())
    }
}

impl fmt::Debug for CardForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardForm")
            .field("network", &self.network().map(|n| n.as_str()))
            .field("number", &"[redacted]")
            .field("expiry", &self.expiry)
            .field("cvc", &"[redacted]")
            .field("cardholder_name", &self.cardholder_name)
            .finish()
    }
}

/// Redacted card details, safe to attach to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Detected network, if any
    pub network: Option<CardNetwork>,
    /// Last four digits of the number
    pub last4: String,
    /// Expiry month
    pub expiry: Expiry,
    /// Name as printed on the card
    pub cardholder_name: String,
}

impl CardSummary {
    /// Display form, e.g. `•••• •••• •••• 1111`
    pub fn masked_number(&self) -> String {
        mask_card_number(&self.last4)
    }
}

/// Mask everything but the last four digits of `number`.
///
/// Non-digits are ignored, so partial or formatted input is fine.
pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    let last4: String = digits[digits.len().saturating_sub(BLOCK_SIZE)..].iter().collect();
    format!("•••• •••• •••• {}", last4)
}
