//! Provider trait definitions
//!
//! Defines the capability interfaces the ingestion, enrichment and pitch
//! services call through. Each trait covers exactly one external call
//! ("search businesses", "crawl one site", "complete one prompt") so a future
//! implementation can fan out with bounded concurrency without changing the
//! callers, which today run strictly sequentially.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider-specific error types for structured error handling
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP error from the upstream provider
    #[error("HTTP {status}: {}", body.as_deref().unwrap_or("no body"))]
    Http { status: u16, body: Option<String> },
    /// Response was 2xx but not in the expected shape
    #[error("malformed response: {details}")]
    MalformedResponse { details: String },
    /// Network or connectivity error
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
    /// Missing credential or invalid setup
    #[error("configuration error: {details}")]
    Configuration { details: String },
}

impl ProviderError {
    pub fn malformed<S: Into<String>>(details: S) -> Self {
        ProviderError::MalformedResponse {
            details: details.into(),
        }
    }

    pub fn configuration<S: Into<String>>(details: S) -> Self {
        ProviderError::Configuration {
            details: details.into(),
        }
    }
}

/// Search parameters for a maps-provider business search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// What to search for, e.g. "hovenier".
    pub search_term: String,
    /// Geographic region to search in, e.g. "Zuid-Holland, Nederland".
    pub region: String,
    /// Maximum number of listings to return.
    pub max_results: u32,
}

/// One raw business listing as returned by the maps provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessListing {
    /// Business name.
    pub title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Google review score.
    pub total_score: Option<f64>,
    pub reviews_count: Option<i32>,
}

/// Maps-scraping provider: search term + region -> raw business listings.
#[async_trait]
pub trait MapsProvider: Send + Sync {
    async fn search_businesses(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<BusinessListing>, ProviderError>;
}

/// Website-crawling provider: URL -> combined readable page text.
#[async_trait]
pub trait CrawlerProvider: Send + Sync {
    async fn crawl_site(&self, url: &str, max_pages: u32) -> Result<String, ProviderError>;
}

/// Text-generation provider: prompt -> free text.
#[async_trait]
pub trait PitchProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
