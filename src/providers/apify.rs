//! Apify actor clients
//!
//! Both the maps scraper and the website crawler are Apify actors driven
//! through the `run-sync-get-dataset-items` endpoint, which runs the actor
//! and returns its dataset as a JSON array in one blocking call. Credentials
//! come from `LEADSCOUT_APIFY_TOKEN`; the API base is overridable for tests.

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use super::trait_::{BusinessListing, CrawlerProvider, MapsProvider, ProviderError, SearchQuery};

/// Actor that extracts business listings from Google Maps.
const MAPS_ACTOR_ID: &str = "compass~google-maps-extractor";
/// Actor that crawls a website and returns readable text per page.
const CRAWLER_ACTOR_ID: &str = "apify~website-content-crawler";

/// Shared plumbing for calling an Apify actor synchronously.
#[derive(Debug, Clone)]
struct ApifyClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl ApifyClient {
    fn new(api_base: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            token,
        }
    }

    fn run_sync_url(&self, actor_id: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items",
            self.api_base.trim_end_matches('/'),
            actor_id
        ))
        .map_err(|e| ProviderError::configuration(format!("invalid Apify API base: {}", e)))?;
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }

    /// Run an actor and return its dataset items.
    async fn run_actor(
        &self,
        actor_id: &str,
        run_input: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        if self.token.is_empty() {
            return Err(ProviderError::configuration(
                "Apify token is not configured; set LEADSCOUT_APIFY_TOKEN",
            ));
        }

        let url = self.run_sync_url(actor_id)?;
        let response = self.http.post(url).json(&run_input).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let items: serde_json::Value = response.json().await?;
        match items {
            serde_json::Value::Array(items) => Ok(items),
            other => Err(ProviderError::malformed(format!(
                "expected dataset array, got {}",
                value_kind(&other)
            ))),
        }
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Maps-scraping provider backed by the Apify Google Maps extractor actor.
pub struct ApifyMapsProvider {
    client: ApifyClient,
}

impl ApifyMapsProvider {
    pub fn new(api_base: String, token: String) -> Self {
        Self {
            client: ApifyClient::new(api_base, token),
        }
    }
}

#[async_trait]
impl MapsProvider for ApifyMapsProvider {
    async fn search_businesses(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<BusinessListing>, ProviderError> {
        let run_input = json!({
            "searchStringsArray": [query.search_term],
            "locationQuery": query.region,
            "maxCrawledPlacesPerSearch": query.max_results,
            "language": "nl",
            "deeperCityScrape": false,
            "includeWebResults": false,
        });

        let items = self.client.run_actor(MAPS_ACTOR_ID, run_input).await?;

        // Listings that fail to parse are dropped rather than failing the run;
        // the actor occasionally emits ads and partial rows.
        let mut listings = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<BusinessListing>(item) {
                Ok(listing) => listings.push(listing),
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping unparseable maps listing");
                }
            }
        }

        Ok(listings)
    }
}

/// Website-crawling provider backed by the Apify website-content-crawler actor.
pub struct ApifyCrawlerProvider {
    client: ApifyClient,
}

impl ApifyCrawlerProvider {
    pub fn new(api_base: String, token: String) -> Self {
        Self {
            client: ApifyClient::new(api_base, token),
        }
    }

    /// The maps provider reports bare domains; the crawler wants a scheme.
    fn normalize_url(url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }
}

#[async_trait]
impl CrawlerProvider for ApifyCrawlerProvider {
    async fn crawl_site(&self, url: &str, max_pages: u32) -> Result<String, ProviderError> {
        let start_url = Self::normalize_url(url);

        let run_input = json!({
            "startUrls": [{ "url": start_url }],
            "maxCrawlPages": max_pages,
            "crawlerType": "playwright:firefox",
            "keepUrlFragments": false,
            "removeElementsCssSelector": "nav, header, footer, .cookie-banner, .popup",
            "htmlTransformer": "readableText",
            "readableTextCharThreshold": 100,
            "saveHtml": false,
            "saveMarkdown": true,
            "saveScreenshots": false,
        });

        let items = self.client.run_actor(CRAWLER_ACTOR_ID, run_input).await?;

        let mut pages = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(markdown) = item.get("markdown").and_then(|v| v.as_str()) {
                pages.push(markdown.to_string());
            } else if let Some(text) = item.get("text").and_then(|v| v.as_str()) {
                pages.push(text.to_string());
            }
        }

        Ok(pages.join("\n\n"))
    }
}
