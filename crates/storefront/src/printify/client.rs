//! Printify REST client implementation.
//!
//! Uses `reqwest` 0.13 with bearer authentication. Shops, product lists and
//! single products are cached with `moka` for the configured TTL.

use std::sync::Arc;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use haqq_core::Product;

use super::PrintifyError;
use super::cache::{CacheValue, PRODUCTS_KEY, SHOP_KEY, product_key};
use super::conversions::convert_product;
use super::types::{PrintifyProduct, PrintifyProductPage, PrintifyShop};
use crate::config::PrintifyConfig;

/// Printify caps `limit` at 50 for product listings.
const PAGE_SIZE: u32 = 50;

/// Upper bound on pages fetched for one listing.
const MAX_PAGES: u32 = 100;

/// Longest product id accepted. Printify ids are 24 hex characters.
const MAX_PRODUCT_ID_LEN: usize = 64;

/// Whether `id` can be used as a single path segment under the shop.
///
/// Ids arrive percent-decoded from URLs and forms, so anything outside
/// `[A-Za-z0-9_-]` could rewrite the upstream path.
fn is_valid_product_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_PRODUCT_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

// =============================================================================
// PrintifyClient
// =============================================================================

/// Client for the Printify catalog API.
///
/// Cheap to clone; clones share the HTTP pool and the cache.
#[derive(Clone)]
pub struct PrintifyClient {
    inner: Arc<PrintifyClientInner>,
}

struct PrintifyClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: SecretString,
    shop_id: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl PrintifyClient {
    /// Create a new Printify client.
    #[must_use]
    pub fn new(config: &PrintifyConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(PrintifyClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                api_token: config.api_token.clone(),
                shop_id: config.shop_id.clone(),
                cache,
            }),
        }
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PrintifyError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(self.inner.api_token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PrintifyError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PrintifyError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PrintifyError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Printify API returned non-success status"
            );
            return Err(PrintifyError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Printify response"
            );
            PrintifyError::Parse(e)
        })
    }

    // =========================================================================
    // Shop Methods
    // =========================================================================

    /// List the shops connected to the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shops(&self) -> Result<Vec<PrintifyShop>, PrintifyError> {
        self.get("/shops.json").await
    }

    /// The shop to sell from: the configured one, else the first shop.
    async fn shop_id(&self) -> Result<String, PrintifyError> {
        if let Some(id) = &self.inner.shop_id {
            return Ok(id.clone());
        }

        if let Some(CacheValue::Shop(id)) = self.inner.cache.get(SHOP_KEY).await {
            return Ok(id);
        }

        let shop = self
            .shops()
            .await?
            .into_iter()
            .next()
            .ok_or(PrintifyError::NoShops)?;
        let id = shop.id.to_string();
        debug!(shop_id = %id, title = %shop.title, "Resolved Printify shop");

        self.inner
            .cache
            .insert(SHOP_KEY.to_string(), CacheValue::Shop(id.clone()))
            .await;

        Ok(id)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Every product in the shop, in Printify's order.
    ///
    /// # Errors
    ///
    /// Returns an error if no shop exists or any page request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, PrintifyError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let shop_id = self.shop_id().await?;
        let mut products = Vec::new();
        let mut page = 1;

        loop {
            let path = format!("/shops/{shop_id}/products.json?limit={PAGE_SIZE}&page={page}");
            let batch: PrintifyProductPage = self.get(&path).await?;
            let has_next = batch.has_next();
            products.extend(batch.data.into_iter().map(convert_product));

            if !has_next || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        debug!(count = products.len(), pages = page, "Fetched Printify products");

        self.inner
            .cache
            .insert(
                PRODUCTS_KEY.to_string(),
                CacheValue::Products(products.clone()),
            )
            .await;

        Ok(products)
    }

    /// A single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`PrintifyError::NotFound`] if the id is malformed or Printify
    /// has no such product in the shop, or another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &str) -> Result<Product, PrintifyError> {
        if !is_valid_product_id(id) {
            debug!("Rejected malformed product id");
            return Err(PrintifyError::NotFound(format!("product {id}")));
        }

        let cache_key = product_key(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let shop_id = self.shop_id().await?;
        let raw: PrintifyProduct = self
            .get(&format!("/shops/{shop_id}/products/{id}.json"))
            .await
            .map_err(|e| match e {
                PrintifyError::NotFound(_) => PrintifyError::NotFound(format!("product {id}")),
                other => other,
            })?;

        let product = convert_product(raw);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }
}
