//! # Product Types
//!
//! Product catalog types for couch-butler.
//! Products come from the backend API, or from `config/products.toml` offline.

use serde::{Deserialize, Serialize};

/// ISO 4217 currencies a price can be quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    PLN,
    EUR,
    USD,
    GBP,
    CHF,
    JPY,
    CAD,
    AUD,
    MXN,
}

impl Currency {
    const ALL: [Currency; 9] = [
        Currency::PLN,
        Currency::EUR,
        Currency::USD,
        Currency::GBP,
        Currency::CHF,
        Currency::JPY,
        Currency::CAD,
        Currency::AUD,
        Currency::MXN,
    ];

    /// Lowercase ISO code, as the backend sends it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::PLN => "pln",
            Currency::EUR => "eur",
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::CHF => "chf",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::MXN => "mxn",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::PLN => "zł",
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::MXN => "MX$",
        }
    }

    /// Parse an ISO code (any case) or a display symbol
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value) || c.symbol() == value)
    }

    /// Digits after the decimal point. Yen has no minor unit.
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Minor units per major unit (100 for grosze and cents, 1 for yen)
    fn minor_per_major(&self) -> i64 {
        10_i64.pow(u32::from(self.decimal_places()))
    }

    /// Whether the symbol trails the amount (`409.99 zł`)
    fn symbol_after(&self) -> bool {
        matches!(self, Currency::PLN | Currency::CHF)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::PLN
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// An amount in the currency's minor unit (grosze, cents, yen) plus its currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// From a decimal amount like `409.99`, rounded to the nearest minor unit
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: (amount * currency.minor_per_major() as f64).round() as i64,
            currency,
        }
    }

    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::from_cents(0, currency)
    }

    pub fn as_decimal(&self) -> f64 {
        self.amount as f64 / self.currency.minor_per_major() as f64
    }

    /// Line total for `quantity` units
    pub fn times(&self, quantity: u32) -> Self {
        Self::from_cents(self.amount * i64::from(quantity), self.currency)
    }

    /// `409.99 zł` for zloty and francs, `$10.00` or `¥500` for the rest
    pub fn display(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let amount = match self.currency.decimal_places() {
            0 => format!("{}{}", sign, abs),
            places => {
                let per = self.currency.minor_per_major().unsigned_abs();
                format!(
                    "{}{}.{:0width$}",
                    sign,
                    abs / per,
                    abs % per,
                    width = usize::from(places)
                )
            }
        };
        if self.currency.symbol_after() {
            format!("{} {}", amount, self.currency.symbol())
        } else {
            format!("{}{}", self.currency.symbol(), amount)
        }
    }
}

/// Something the storefront sells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Stock keeping unit (e.g., "SNACK-001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Current selling price
    pub price: Price,

    /// Previous price shown struck through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,

    /// Inactive products stay in the catalog but are never listed
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new purchasable product
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            sku: None,
            name: name.into(),
            description: String::new(),
            price,
            old_price: None,
            active: true,
            image_url: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the struck-through previous price
    pub fn with_old_price(mut self, price: Price) -> Self {
        self.old_price = Some(price);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Whole-percent saving against the old price, when there is one
    pub fn discount_percent(&self) -> Option<u8> {
        let old = self.old_price.as_ref()?;
        if old.currency != self.price.currency || old.amount <= self.price.amount {
            return None;
        }
        let saved = (old.amount - self.price.amount) as f64 / old.amount as f64;
        Some((saved * 100.0).round() as u8)
    }
}

/// Product catalog (loaded from config or the API)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that may be listed
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// The product the landing page shows: the active product with `sku`,
    /// falling back to the first active product
    pub fn featured(&self, sku: Option<&str>) -> Option<&Product> {
        sku.and_then(|sku| {
            self.active_products()
                .find(|p| p.sku.as_deref() == Some(sku))
        })
        .or_else(|| self.active_products().next())
    }

    /// Parse a `[[products]]` TOML document
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl From<Vec<Product>> for ProductCatalog {
    fn from(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_rounding() {
        assert_eq!(Price::new(409.99, Currency::PLN).amount, 40999);
        assert_eq!(Price::new(0.1 + 0.2, Currency::PLN).amount, 30);
        assert_eq!(Price::from_cents(40999, Currency::PLN).as_decimal(), 409.99);
    }

    #[test]
    fn test_yen_has_no_minor_unit() {
        assert_eq!(Currency::JPY.decimal_places(), 0);
        assert_eq!(Price::new(1000.0, Currency::JPY).amount, 1000);
        assert_eq!(Price::from_cents(1000, Currency::JPY).as_decimal(), 1000.0);
        assert_eq!(Price::from_cents(500, Currency::JPY).display(), "¥500");
    }

    #[test]
    fn test_parse_every_currency() {
        for (input, expected) in [
            ("jpy", Currency::JPY),
            ("CAD", Currency::CAD),
            ("A$", Currency::AUD),
            ("MX$", Currency::MXN),
            ("chf", Currency::CHF),
        ] {
            assert_eq!(Currency::parse(input), Some(expected), "{}", input);
        }
        assert_eq!(Price::new(12.5, Currency::CAD).display(), "C$12.50");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse("zł"), Some(Currency::PLN));
        assert_eq!(Currency::parse("PLN"), Some(Currency::PLN));
        assert_eq!(Currency::parse(" eur "), Some(Currency::EUR));
        assert_eq!(Currency::parse("€"), Some(Currency::EUR));
        assert_eq!(Currency::parse("doubloon"), None);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(409.99, Currency::PLN).display(), "409.99 zł");
        assert_eq!(Price::new(29.99, Currency::USD).display(), "$29.99");
        assert_eq!(Price::new(19.99, Currency::EUR).display(), "€19.99");
        assert_eq!(Price::from_cents(5, Currency::GBP).display(), "£0.05");
        assert_eq!(Price::from_cents(-250, Currency::PLN).display(), "-2.50 zł");
        assert_eq!(Currency::PLN.to_string(), "PLN");
        assert_eq!(Price::new(10.0, Currency::PLN).times(3).amount, 3000);
    }

    #[test]
    fn test_discount_percent() {
        let product = Product::new("butler", "Couch Butler", Price::new(409.99, Currency::PLN))
            .with_old_price(Price::new(829.99, Currency::PLN));
        assert_eq!(product.discount_percent(), Some(51));

        let plain = Product::new("p", "P", Price::new(10.0, Currency::PLN));
        assert_eq!(plain.discount_percent(), None);

        let odd = Product::new("p", "P", Price::new(10.0, Currency::PLN))
            .with_old_price(Price::new(5.0, Currency::PLN));
        assert_eq!(odd.discount_percent(), None);
    }

    #[test]
    fn test_featured_product() {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new("a", "First", Price::new(1.0, Currency::PLN)).with_sku("A-1"));
        catalog.add(
            Product::new("b", "Butler", Price::new(2.0, Currency::PLN)).with_sku("SNACK-001"),
        );

        assert_eq!(catalog.featured(Some("SNACK-001")).unwrap().id, "b");
        assert_eq!(catalog.featured(Some("missing")).unwrap().id, "a");
        assert_eq!(catalog.featured(None).unwrap().id, "a");

        catalog.products[0].active = false;
        assert_eq!(catalog.featured(None).unwrap().id, "b");
        assert!(ProductCatalog::new().featured(None).is_none());
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ProductCatalog::from_toml(
            r#"
            [[products]]
            id = "couch-butler"
            sku = "SNACK-001"
            name = "Couch Butler"
            price = { amount = 40999, currency = "pln" }
            old_price = { amount = 82999, currency = "pln" }

            [[products]]
            id = "retired"
            name = "Retired"
            active = false
            price = { amount = 100, currency = "pln" }
            "#,
        )
        .unwrap();

        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.active_products().count(), 1);
        let butler = catalog.get("couch-butler").unwrap();
        assert_eq!(butler.price.display(), "409.99 zł");
        assert_eq!(butler.discount_percent(), Some(51));
    }
}
