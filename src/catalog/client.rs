use super::query::SearchRequest;
use super::types::CatalogSearchResponse;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// Failure to obtain a search response from the catalog.
///
/// Every variant is surfaced to the user the same way; none is retried
/// automatically.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog returned HTTP {0}")]
    Status(StatusCode),
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

/// Anything able to answer a catalog search.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<CatalogSearchResponse, CatalogError>;
}

/// HTTP client for the Open Library search endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl CatalogClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search(&self, request: &SearchRequest) -> Result<CatalogSearchResponse, CatalogError> {
        let url = request.url(&self.endpoint);
        tracing::debug!("GET {}", url);

        let mut builder = self.http_client.get(url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Catalog search '{}' failed with {}", request.query, status);
            return Err(CatalogError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: CatalogSearchResponse =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;

        tracing::debug!(
            "Catalog search '{}' returned {} of {} records",
            request.query,
            parsed.docs.len(),
            parsed.total()
        );
        Ok(parsed)
    }
}
