//! News API client.
//!
//! Wraps the two read endpoints the service proxies: `/top-headlines` for a
//! country's current headlines and `/everything` for full-text search.
//!
//! # API Reference
//!
//! See: <https://newsapi.org/docs/endpoints>
//!
//! # Authentication
//!
//! Every request carries the configured key in the `X-Api-Key` header, so the
//! key never appears in request URLs or logs.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::config::{Config, MAX_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::model::NewsArticle;

/// Per-request timeout for news provider calls.
pub const NEWS_API_TIMEOUT: Duration = Duration::from_secs(10);

const HEADLINES_UNAVAILABLE: &str = "Failed to fetch news. Please try again later.";
const SEARCH_UNAVAILABLE: &str = "Failed to search for news. Please try again later.";

/// Parameters for a full-text search.
#[derive(Debug, Clone)]
pub struct SearchParams<'a> {
    pub query: &'a str,
    pub country_code: Option<&'a str>,
    pub language: &'a str,
    pub sort_by: &'a str,
    pub page_size: Option<u32>,
    pub page: u32,
}

/// Client for the news provider.
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_page_size: u32,
}

impl NewsClient {
    /// Create a client from the service configuration.
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Self::with_base_url(
            &config.news_api_base_url,
            &config.news_api_key,
            config.default_page_size,
        )
    }

    /// Create a client with an explicit base URL (for testing).
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        default_page_size: u32,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NEWS_API_TIMEOUT)
            .user_agent(concat!("country-analytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            default_page_size,
        })
    }

    /// Page size actually sent upstream: the configured default when unset,
    /// clamped to `1..=100`.
    pub fn effective_page_size(&self, page_size: Option<u32>) -> u32 {
        page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Fetch top headlines for a country.
    ///
    /// # Arguments
    ///
    /// * `country_code` - ISO 3166-1 alpha-2 code; any case, exactly two characters
    /// * `page_size` - Results per page; defaults to the configured page size
    /// * `page` - 1-based page number
    /// * `category` - Optional category (business, sports, technology, ...)
    ///
    /// Fails with [`Error::InvalidArgument`] before any network call if the
    /// country code is malformed.
    pub async fn fetch_headlines(
        &self,
        country_code: &str,
        page_size: Option<u32>,
        page: u32,
        category: Option<&str>,
    ) -> Result<Vec<NewsArticle>> {
        let url = self.headlines_url(country_code, page_size, page, category)?;
        self.get_articles(&url, HEADLINES_UNAVAILABLE).await
    }

    /// Search all articles.
    pub async fn search_news(&self, params: &SearchParams<'_>) -> Result<Vec<NewsArticle>> {
        let url = self.search_url(params);
        self.get_articles(&url, SEARCH_UNAVAILABLE).await
    }

    fn headlines_url(
        &self,
        country_code: &str,
        page_size: Option<u32>,
        page: u32,
        category: Option<&str>,
    ) -> Result<String> {
        if country_code.chars().count() != 2 {
            return Err(Error::InvalidArgument(
                "Invalid country code. Must be a 2-letter ISO 3166-1 alpha-2 code.".to_string(),
            ));
        }

        let mut params = vec![
            ("country", country_code.to_lowercase()),
            ("pageSize", self.effective_page_size(page_size).to_string()),
            ("page", page.max(1).to_string()),
        ];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            params.push(("category", category.to_lowercase()));
        }

        Ok(self.build_url("top-headlines", &params))
    }

    fn search_url(&self, params: &SearchParams<'_>) -> String {
        let mut query = vec![
            ("q", params.query.to_string()),
            ("language", params.language.to_string()),
            ("sortBy", params.sort_by.to_string()),
            ("pageSize", self.effective_page_size(params.page_size).to_string()),
            ("page", params.page.max(1).to_string()),
        ];
        if let Some(code) = params.country_code.filter(|c| !c.is_empty()) {
            query.push(("country", code.to_lowercase()));
        }

        self.build_url("everything", &query)
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("{}/{}?{}", self.base_url, endpoint, query.join("&"))
    }

    async fn get_articles(&self, url: &str, unavailable: &'static str) -> Result<Vec<NewsArticle>> {
        debug!(url = %url, "Querying news provider");

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "News provider request failed");
                Error::UpstreamUnavailable(unavailable.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read news provider response");
            Error::UpstreamUnavailable(unavailable.to_string())
        })?;

        match serde_json::from_slice::<NewsApiResponse>(&body) {
            Ok(envelope) if envelope.status != "ok" => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string());
                warn!(%status, code = ?envelope.code, message = %message, "News provider returned an error");
                Err(Error::UpstreamError(format!("News API error: {}", message)))
            }
            Ok(envelope) if status.is_success() => Ok(envelope.articles),
            Err(e) if status.is_success() => Err(Error::UpstreamFormat(e.to_string())),
            _ => {
                error!(%status, "News provider returned an error status");
                Err(Error::UpstreamUnavailable(unavailable.to_string()))
            }
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

/// Envelope shared by every news provider endpoint.
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,

    #[serde(default)]
    articles: Vec<NewsArticle>,

    /// Machine-readable error code (e.g. "apiKeyInvalid"), only on errors.
    #[serde(default)]
    code: Option<String>,

    /// Human-readable error message, only on errors.
    #[serde(default)]
    message: Option<String>,
}
