//! # Client Configuration
//!
//! Configuration for the storefront API client.
//! Values are loaded from environment variables (and `.env` if present).

use butler_core::{StoreError, StoreResult};
use std::env;
use std::time::Duration;

/// Default backend location
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Storefront API client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Primary API base URL, no trailing slash
    pub api_base_url: String,

    /// Extra base URLs tried in order when listing products
    pub fallback_urls: Vec<String>,

    /// Request timeout
    pub timeout: Duration,

    /// SKU of the product the landing page features
    pub featured_sku: Option<String>,

    /// Bearer token to start with
    pub auth_token: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `BUTLER_API_URL` (default `http://localhost:3001/api`)
    /// - `BUTLER_API_URLS` comma-separated failover list
    /// - `BUTLER_TIMEOUT_SECS` (default 30)
    /// - `BUTLER_FEATURED_SKU`
    /// - `BUTLER_AUTH_TOKEN`
    pub fn from_env() -> StoreResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (env, map, ...)
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = normalize_url(
            &non_empty("BUTLER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let mut fallback_urls = Vec::new();
        if let Some(list) = non_empty("BUTLER_API_URLS") {
            for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let url = normalize_url(raw)?;
                if url != api_base_url && !fallback_urls.contains(&url) {
                    fallback_urls.push(url);
                }
            }
        }

        let timeout = match non_empty("BUTLER_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|_| {
                    StoreError::Configuration(format!(
                        "BUTLER_TIMEOUT_SECS must be a whole number of seconds, got {}",
                        secs
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30),
        };

        Ok(Self {
            api_base_url,
            fallback_urls,
            timeout,
            featured_sku: non_empty("BUTLER_FEATURED_SKU"),
            auth_token: non_empty("BUTLER_AUTH_TOKEN"),
        })
    }

    /// Create config for a single base URL
    pub fn new(api_base_url: &str) -> StoreResult<Self> {
        Ok(Self {
            api_base_url: normalize_url(api_base_url)?,
            fallback_urls: Vec::new(),
            timeout: Duration::from_secs(30),
            featured_sku: None,
            auth_token: None,
        })
    }

    /// Builder: add a failover base URL
    pub fn with_fallback_url(mut self, url: &str) -> StoreResult<Self> {
        self.fallback_urls.push(normalize_url(url)?);
        Ok(self)
    }

    /// Builder: set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Primary URL followed by the fallbacks
    pub fn base_urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.api_base_url.as_str()).chain(self.fallback_urls.iter().map(String::as_str))
    }

    /// Full URL for an endpoint path on the primary base
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            fallback_urls: Vec::new(),
            timeout: Duration::from_secs(30),
            featured_sku: None,
            auth_token: None,
        }
    }
}

/// `base` + `/path`, with exactly one slash between
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn normalize_url(raw: &str) -> StoreResult<String> {
    let url = raw.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(StoreError::Configuration(format!(
            "API URL must start with http:// or https://, got {}",
            url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint("/products"), "http://localhost:3001/api/products");
    }

    #[test]
    fn test_failover_list() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BUTLER_API_URL", "http://localhost:3001/api/"),
            (
                "BUTLER_API_URLS",
                "http://localhost:3001/api, http://localhost:3000/api ,,https://shop.example/api",
            ),
            ("BUTLER_FEATURED_SKU", "SNACK-001"),
        ]))
        .unwrap();

        let urls: Vec<_> = config.base_urls().collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:3001/api",
                "http://localhost:3000/api",
                "https://shop.example/api"
            ]
        );
        assert_eq!(config.featured_sku.as_deref(), Some("SNACK-001"));
    }

    #[test]
    fn test_invalid_values() {
        let err = ClientConfig::from_lookup(lookup(&[("BUTLER_API_URL", "/api")])).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));

        let err =
            ClientConfig::from_lookup(lookup(&[("BUTLER_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("BUTLER_TIMEOUT_SECS"));
    }

    #[test]
    fn test_timeout_and_token() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BUTLER_TIMEOUT_SECS", "5"),
            ("BUTLER_AUTH_TOKEN", "tok_123"),
            ("BUTLER_FEATURED_SKU", "  "),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.auth_token.as_deref(), Some("tok_123"));
        assert!(config.featured_sku.is_none());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a/api/", "/orders"), "http://a/api/orders");
        assert_eq!(join_url("http://a/api", "orders/1"), "http://a/api/orders/1");
    }
}
