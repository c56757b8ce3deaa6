//! # Storefront Client
//!
//! `reqwest` client for the storefront backend, implementing
//! [`Storefront`](butler_core::Storefront).

use crate::config::{join_url, ClientConfig};
use crate::wire::{DataEnvelope, WireError, WireProduct, WireProductBody};
use async_trait::async_trait;
use butler_core::{
    OrderReceipt, OrderRequest, Product, StoreError, StoreResult, Storefront,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, instrument, warn};

/// HTTP client for the storefront API.
///
/// Cheap to clone; clones share the bearer token.
#[derive(Clone)]
pub struct StorefrontClient {
    config: ClientConfig,
    http: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl StorefrontClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        let token = Arc::new(RwLock::new(config.auth_token.clone()));

        Ok(Self {
            config,
            http,
            token,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> StoreResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Replace the bearer token
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    /// Featured product from the catalog, honouring the configured SKU
    pub async fn featured_product(&self) -> StoreResult<Option<Product>> {
        let catalog = butler_core::ProductCatalog::from(self.products(None).await?);
        Ok(catalog
            .featured(self.config.featured_sku.as_deref())
            .cloned())
    }

    /// GET `path` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let request = self.http.get(self.config.endpoint(path));
        self.send(request).await
    }

    /// POST `body` as JSON to `path`
    pub async fn post<B, T>(&self, path: &str, body: &B) -> StoreResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.config.endpoint(path)).json(body);
        self.send(request).await
    }

    /// PUT `body` as JSON to `path`
    pub async fn put<B, T>(&self, path: &str, body: &B) -> StoreResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.config.endpoint(path)).json(body);
        self.send(request).await
    }

    /// DELETE `path`, discarding any response body
    pub async fn delete(&self, path: &str) -> StoreResult<()> {
        let request = self.http.delete(self.config.endpoint(path));
        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        Ok(())
    }

    /// Like [`get`](Self::get) but a 404 becomes `Ok(None)`
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> StoreResult<Option<T>> {
        let request = self.http.get(self.config.endpoint(path));
        let (status, body) = self.execute(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(status, &body).map(Some)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let (status, body) = self.execute(request).await?;
        decode(status, &body)
    }

    async fn execute(&self, request: RequestBuilder) -> StoreResult<(StatusCode, String)> {
        let request = match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !status.is_success() && status != StatusCode::NOT_FOUND {
            error!("Storefront API error: status={}, body={}", status, body);
        }

        Ok((status, body))
    }

    /// One attempt at listing products from a single base URL
    async fn products_from(&self, base: &str, query: Option<&str>) -> StoreResult<Vec<Product>> {
        let mut request = self.http.get(join_url(base, "products"));
        if let Some(q) = query {
            request = request.query(&[("search", q)]);
        }
        let envelope: DataEnvelope<WireProduct> = self.send(request).await?;
        Ok(envelope.data.into_iter().map(WireProduct::into_product).collect())
    }
}

/// Catalog management. The backend only accepts these with an admin token.
impl StorefrontClient {
    /// POST a new product; the backend assigns the id
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &Product) -> StoreResult<Product> {
        let created: WireProduct = self
            .post("products", &WireProductBody::from_product(product))
            .await?;
        info!("Created product {}", created.id);
        Ok(created.into_product())
    }

    /// PUT the full product over `id`
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: &str, product: &Product) -> StoreResult<Product> {
        check_path_id(id)?;
        let updated: WireProduct = self
            .put(&format!("products/{}", id), &WireProductBody::from_product(product))
            .await?;
        Ok(updated.into_product())
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> StoreResult<()> {
        check_path_id(id)?;
        self.delete(&format!("products/{}", id)).await?;
        info!("Deleted product {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("config", &self.config.api_base_url)
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

#[async_trait]
impl Storefront for StorefrontClient {
    #[instrument(skip(self))]
    async fn products(&self, query: Option<&str>) -> StoreResult<Vec<Product>> {
        let mut last_error = None;

        for base in self.config.base_urls() {
            match self.products_from(base, query).await {
                Ok(products) => {
                    info!("Loaded {} products from {}", products.len(), base);
                    return Ok(products);
                }
                Err(e) => {
                    warn!("Product listing failed at {}: {}", base, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| StoreError::Configuration("No API base URL configured".to_string())))
    }

    #[instrument(skip(self))]
    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        check_path_id(id)?;
        let product: Option<WireProduct> = self.get_optional(&format!("products/{}", id)).await?;
        Ok(product.map(WireProduct::into_product))
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create_order(&self, order: &OrderRequest) -> StoreResult<OrderReceipt> {
        if order.items.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let request = self
            .http
            .post(self.config.endpoint("orders"))
            .header("Idempotency-Key", &order.idempotency_key)
            .json(order);

        let receipt: OrderReceipt = self.send(request).await?;

        info!(
            "Created order: id={}, {} items, total={}, payment={:?}",
            receipt.id,
            order.item_count(),
            order.total.display(),
            order.payment_method
        );

        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn orders(&self) -> StoreResult<Vec<OrderReceipt>> {
        let envelope: DataEnvelope<OrderReceipt> = self.get("orders").await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self))]
    async fn order(&self, id: &str) -> StoreResult<Option<OrderReceipt>> {
        check_path_id(id)?;
        self.get_optional(&format!("orders/{}", id)).await
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

fn check_path_id(id: &str) -> StoreResult<()> {
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(StoreError::InvalidRequest(format!("Invalid id: {:?}", id)));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> StoreResult<T> {
    if !status.is_success() {
        return Err(error_from_response(status, body));
    }
    serde_json::from_str(body)
        .map_err(|e| StoreError::Serialization(format!("Failed to parse API response: {}", e)))
}

fn error_from_response(status: StatusCode, body: &str) -> StoreError {
    let message = match serde_json::from_str::<WireError>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        Err(_) => body.to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
        _ => StoreError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
