//! HTTP client for the catalog search and product detail endpoints.

use crate::catalog::error::{Result, ServiceError};
use crate::catalog::models::{Product, ProductDto, SearchResponse, SearchResultsProduct};
use crate::config::Config;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Outcome of a search: `None` when the catalog has no matching products.
pub type SearchResult = Result<Option<Vec<SearchResultsProduct>>>;

/// Outcome of a product detail lookup.
pub type DetailResult = Result<Product>;

/// Trait for catalog search/detail fetching - enables stubbing for tests.
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Fetches the first page of products for the configured search term.
    async fn fetch_list(&self) -> SearchResult;

    /// Fetches the full record for a product id.
    async fn fetch_product_details(&self, product_id: &str) -> DetailResult;
}

/// Catalog HTTP client.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
    search_term: String,
    page_size: u32,
}

impl CatalogClient {
    /// Creates a new catalog client from the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("No API key configured. Set CATALOG_API_KEY or api_key in the config file.")?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            search_term: config.search_term.clone(),
            page_size: config.page_size,
        })
    }

    /// Switches the term used by `fetch_list`.
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Returns the search term used by `fetch_list`.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    fn search_url(&self) -> String {
        format!(
            "{}/products/search?q={}&key={}&pageSize={}",
            self.base_url,
            urlencoding::encode(&self.search_term),
            urlencoding::encode(&self.api_key),
            self.page_size
        )
    }

    fn detail_url(&self, product_id: &str) -> String {
        format!(
            "{}/products/{}?key={}",
            self.base_url,
            urlencoding::encode(product_id),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", redact_key(url));

        let transport =
            |source: wreq::Error| ServiceError::Transport { url: redact_key(url), source };

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(ServiceError::Status { url: redact_key(url), status: status.as_u16() });
        }

        let body = response.text().await.map_err(transport)?;

        serde_json::from_str(&body)
            .map_err(|source| ServiceError::Decode { url: redact_key(url), source })
    }
}

#[async_trait]
impl ProductsService for CatalogClient {
    async fn fetch_list(&self) -> SearchResult {
        info!("Searching: {} (page size {})", self.search_term, self.page_size);

        let response: SearchResponse = self.get_json(&self.search_url()).await?;
        if let Some(total) = response.results {
            debug!("Catalog reports {} matching products", total);
        }

        let products: Vec<SearchResultsProduct> = response
            .products
            .unwrap_or_default()
            .into_iter()
            .filter_map(|dto| {
                if dto.product_id.trim().is_empty() {
                    warn!("Skipping search result without product id: {}", dto.title);
                    None
                } else {
                    Some(SearchResultsProduct::from(dto))
                }
            })
            .collect();

        if products.is_empty() {
            debug!("No products for search term: {}", self.search_term);
            return Ok(None);
        }

        debug!("Decoded {} products", products.len());
        Ok(Some(products))
    }

    async fn fetch_product_details(&self, product_id: &str) -> DetailResult {
        info!("Fetching product: {}", product_id);

        let dto: ProductDto = self.get_json(&self.detail_url(product_id)).await?;
        Ok(dto.into_product(product_id))
    }
}

/// Strips the API key value from a URL before it is logged or reported.
fn redact_key(url: &str) -> String {
    let Some(start) = url.find("key=") else {
        return url.to_string();
    };

    let value_start = start + "key=".len();
    let value_end = url[value_start..].find('&').map_or(url.len(), |i| value_start + i);
    format!("{}***{}", &url[..value_start], &url[value_end..])
}
