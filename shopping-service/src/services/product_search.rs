//! Product search provider client.
//!
//! Forwards a free-text query to the RapidAPI product search endpoint and
//! reshapes its product list into [`SearchResult`]s.

use crate::config::ProductSearchConfig;
use crate::models::{search_result::MISSING_TEXT, SearchResult};
use anyhow::anyhow;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

/// Filters sent with every query: US store, relevance order, first page, no
/// condition/prime/deal restrictions.
const FIXED_PARAMS: [(&str, &str); 6] = [
    ("country", "US"),
    ("sort_by", "RELEVANCE"),
    ("page", "1"),
    ("product_condition", "ALL"),
    ("is_prime", "false"),
    ("deals_and_discounts", "NONE"),
];

#[derive(Clone)]
pub struct ProductSearchClient {
    client: Client,
    config: ProductSearchConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    data: Option<ProviderData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderData {
    #[serde(default)]
    products: Option<Vec<ProviderProduct>>,
}

#[derive(Debug, Deserialize)]
struct ProviderProduct {
    product_title: Option<String>,
    product_price: Option<serde_json::Value>,
    product_url: Option<String>,
    product_photo: Option<String>,
}

impl From<ProviderProduct> for SearchResult {
    fn from(product: ProviderProduct) -> Self {
        let price = match product.product_price {
            None | Some(serde_json::Value::Null) => MISSING_TEXT.to_string(),
            Some(serde_json::Value::String(price)) => price,
            Some(other) => other.to_string(),
        };

        SearchResult {
            title: product
                .product_title
                .unwrap_or_else(|| MISSING_TEXT.to_string()),
            price,
            link: product.product_url.unwrap_or_default(),
            image: product.product_photo.unwrap_or_default(),
        }
    }
}

impl ProductSearchClient {
    pub fn new(config: ProductSearchConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Run one provider query.
    ///
    /// Errors: empty query is `BadRequest` (no request is sent), an empty
    /// product list is `NotFound`, a non-200 provider answer is `Upstream`
    /// with the provider's status and body.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow!("Query parameter is required")));
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", self.config.api_key.expose_secret())
            .header("X-RapidAPI-Host", &self.config.api_host)
            .query(&[("query", query)])
            .query(&FIXED_PARAMS[..])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Product search request failed");
                AppError::InternalError(anyhow!(e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::InternalError(anyhow!(e)))?;

        tracing::debug!(status = %status, query = %query, "Product search response");

        if status != StatusCode::OK {
            tracing::warn!(status = %status, "Product search provider returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ProviderResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::InternalError(anyhow!("Failed to parse response: {}", e)))?;

        let products = parsed
            .data
            .and_then(|data| data.products)
            .unwrap_or_default();

        if products.is_empty() {
            return Err(AppError::NotFound(anyhow!("No products found.")));
        }

        tracing::info!(query = %query, count = products.len(), "Product search succeeded");

        Ok(products.into_iter().map(SearchResult::from).collect())
    }
}
