//! # Storefront Trait
//!
//! The seam between the storefront UI and wherever products and orders live.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              Storefront (trait)               │
//! │  ├── products() / product()                   │
//! │  ├── create_order()                           │
//! │  └── orders() / order()                       │
//! └───────────────────────────────────────────────┘
//!                        ▲
//!          ┌─────────────┴─────────────┐
//!  ┌───────┴────────┐         ┌────────┴────────┐
//!  │StorefrontClient│         │OfflineStorefront│
//!  │ (butler-client)│         │  (TOML catalog) │
//!  └────────────────┘         └─────────────────┘
//! ```

use crate::error::{StoreError, StoreResult};
use crate::order::{OrderReceipt, OrderRequest, OrderStatus};
use crate::product::{Product, ProductCatalog};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Products and orders, local or remote.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// List products, optionally filtered by a search query
    async fn products(&self, query: Option<&str>) -> StoreResult<Vec<Product>>;

    /// Fetch one product. `Ok(None)` when it does not exist.
    async fn product(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Submit an order
    async fn create_order(&self, order: &OrderRequest) -> StoreResult<OrderReceipt>;

    /// List orders visible to the current user
    async fn orders(&self) -> StoreResult<Vec<OrderReceipt>>;

    /// Fetch one order. `Ok(None)` when it does not exist.
    async fn order(&self, id: &str) -> StoreResult<Option<OrderReceipt>>;

    /// Backend name (for logging)
    fn name(&self) -> &'static str;
}

/// Type alias for a boxed storefront (dynamic dispatch)
pub type BoxedStorefront = Arc<dyn Storefront>;

/// Storefront backed by a static catalog, keeping orders in memory
#[derive(Debug, Default)]
pub struct OfflineStorefront {
    catalog: ProductCatalog,
    orders: Mutex<Vec<OrderReceipt>>,
}

impl OfflineStorefront {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            catalog,
            orders: Mutex::new(Vec::new()),
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    fn lock_orders(&self) -> StoreResult<std::sync::MutexGuard<'_, Vec<OrderReceipt>>> {
        self.orders
            .lock()
            .map_err(|_| StoreError::Internal("order list lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storefront for OfflineStorefront {
    async fn products(&self, query: Option<&str>) -> StoreResult<Vec<Product>> {
        let needle = query.map(str::to_lowercase);
        Ok(self
            .catalog
            .active_products()
            .filter(|p| match &needle {
                Some(q) => {
                    p.name.to_lowercase().contains(q.as_str())
                        || p.description.to_lowercase().contains(q.as_str())
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.catalog.get(id).cloned())
    }

    async fn create_order(&self, order: &OrderRequest) -> StoreResult<OrderReceipt> {
        if order.items.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        for item in &order.items {
            if self.catalog.get(&item.product_id).is_none() {
                return Err(StoreError::ProductNotFound {
                    product_id: item.product_id.clone(),
                });
            }
        }

        let mut orders = self.lock_orders()?;
        if let Some(existing) = orders.iter().find(|o| o.id == order.id) {
            return Ok(existing.clone());
        }

        let receipt = OrderReceipt {
            id: order.id.clone(),
            status: OrderStatus::Pending,
            total: Some(order.total.clone()),
            created_at: Some(order.created_at),
        };
        orders.push(receipt.clone());
        Ok(receipt)
    }

    async fn orders(&self) -> StoreResult<Vec<OrderReceipt>> {
        Ok(self.lock_orders()?.clone())
    }

    async fn order(&self, id: &str) -> StoreResult<Option<OrderReceipt>> {
        Ok(self.lock_orders()?.iter().find(|o| o.id == id).cloned())
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
