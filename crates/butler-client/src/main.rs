//! # butler
//!
//! Command line companion for the couch-butler storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the backend
//! export BUTLER_API_URL=http://localhost:3001/api
//!
//! butler products
//! butler products --catalog config/products.toml
//! butler check-card --number "4111 1111 1111 1111" --expiry 12/30
//! ```

use anyhow::Context;
use butler_client::StorefrontClient;
use butler_core::{
    card, BoxedStorefront, OfflineStorefront, Product, ProductCatalog, Storefront,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "butler", version, about = "couch-butler storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products
    Products {
        /// Search term
        #[arg(long)]
        search: Option<String>,
        /// Read products from a TOML catalog instead of the API
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show one product
    Product {
        id: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List orders for the configured token
    Orders,
    /// Run the card validators locally, nothing is sent anywhere
    CheckCard {
        #[arg(long)]
        number: String,
        #[arg(long)]
        expiry: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Products { search, catalog } => {
            let store = storefront(catalog.as_deref())?;
            let products = store.products(search.as_deref()).await?;
            info!("{} products from {}", products.len(), store.name());
            for product in &products {
                print_product(product);
            }
        }
        Command::Product { id, catalog } => {
            let store = storefront(catalog.as_deref())?;
            match store.product(&id).await? {
                Some(product) => print_product(&product),
                None => anyhow::bail!("Product not found: {}", id),
            }
        }
        Command::Orders => {
            let client = StorefrontClient::from_env()?;
            for order in client.orders().await? {
                let total = order
                    .total
                    .as_ref()
                    .map(|t| t.display())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{:?}\t{}", order.id, order.status, total);
            }
        }
        Command::CheckCard { number, expiry } => check_card(&number, &expiry),
    }

    Ok(())
}

/// API client, or an offline catalog when a path is given
fn storefront(catalog: Option<&std::path::Path>) -> anyhow::Result<BoxedStorefront> {
    match catalog {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let catalog = ProductCatalog::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("Loaded {} products from {}", catalog.products.len(), path.display());
            Ok(Arc::new(OfflineStorefront::new(catalog)))
        }
        None => Ok(Arc::new(StorefrontClient::from_env()?)),
    }
}

fn print_product(product: &Product) {
    let discount = product
        .discount_percent()
        .map(|d| format!(" (-{}%)", d))
        .unwrap_or_default();
    println!(
        "{}\t{}\t{}{}",
        product.id,
        product.name,
        product.price.display(),
        discount
    );
}

fn check_card(number: &str, expiry: &str) {
    for line in card_report(number, expiry) {
        println!("{}", line);
    }
}

/// Lines printed by `check-card`. Only the last four digits are ever shown.
fn card_report(number: &str, expiry: &str) -> Vec<String> {
    let formatted = card::format_card_number(number);
    let network = card::classify_network(&formatted)
        .map(|n| n.display_name())
        .unwrap_or("unknown");

    let mut lines = vec![
        format!("network: {}", network),
        format!("number:  {}", card::mask_card_number(&formatted)),
    ];
    lines.push(match card::validate_card_number(&formatted) {
        Ok(()) => "number:  ok".to_string(),
        Err(e) => format!("number:  {}", e),
    });

    let expiry = card::format_expiry(expiry);
    lines.push(match card::validate_expiry_now(&expiry) {
        Ok(parsed) => format!("expiry:  {} ok", parsed),
        Err(e) => format!("expiry:  {} ({})", e, expiry),
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use butler_core::CardError;
    use std::path::Path;

    #[tokio::test]
    async fn test_offline_catalog_storefront() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/products.toml");
        let store = storefront(Some(&path)).unwrap();
        assert_eq!(store.name(), "offline");

        let products = store.products(None).await.unwrap();
        assert!(products.iter().any(|p| p.sku.as_deref() == Some("SNACK-001")));
    }

    #[test]
    fn test_missing_catalog_file() {
        let err = storefront(Some(Path::new("does/not/exist.toml"))).err().unwrap();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_card_report_masks_number() {
        let report = card_report("4111111111111111", "1299").join("\n");
        assert!(report.contains("network: Visa"));
        assert!(report.contains("•••• •••• •••• 1111"));
        assert!(report.contains("number:  ok"));
        assert!(report.contains("expiry:  12/99 ok"));
        assert!(!report.contains("4111 1111"));
    }

    #[test]
    fn test_card_report_failures() {
        let report = card_report("4111111111111112", "0120");
        assert_eq!(report[0], "network: Visa");
        assert_eq!(report[2], format!("number:  {}", CardError::InvalidCardNumber));
        assert_eq!(
            report[3],
            format!("expiry:  {} (01/20)", CardError::ExpiredCard)
        );
    }
}
