//! REST Countries client.
//!
//! Fetches name, region, population and area for every country in a single
//! request and projects the nested payload into flat [`CountryRecord`]s.
//!
//! # API Reference
//!
//! See: <https://restcountries.com/>

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::CountryRecord;

/// Client for the country-metadata provider.
#[derive(Clone)]
pub struct CountryClient {
    client: reqwest::Client,
    url: String,
}

impl CountryClient {
    /// Create a client for the given endpoint URL.
    ///
    /// `url` is the full request URL, including the `fields` projection.
    /// Fails only if the HTTP client cannot be initialized.
    pub fn new(url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("country-analytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch every country. No caching: each call hits the network.
    pub async fn fetch_countries(&self) -> Result<Vec<CountryRecord>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(error = %e, "Country provider request failed");
            Error::UpstreamUnavailable(format!("country provider unreachable: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Country provider returned an error status");
            return Err(Error::UpstreamUnavailable(format!(
                "country provider returned HTTP {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("failed to read country provider response: {}", e))
        })?;

        parse_countries(&body)
    }
}

// ============================================================================
// Response types
// ============================================================================

/// One element of the provider's JSON array.
#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    region: String,
    population: u64,
    area: f64,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

/// Decode a provider payload into records.
///
/// Fails if any element is missing a required field. Entries with a
/// non-positive area are skipped so density is always finite.
pub fn parse_countries(body: &[u8]) -> Result<Vec<CountryRecord>> {
    let raw: Vec<RawCountry> =
        serde_json::from_slice(body).map_err(|e| Error::UpstreamFormat(e.to_string()))?;

    let total = raw.len();
    let records: Vec<CountryRecord> = raw
        .into_iter()
        .filter(|c| c.area > 0.0)
        .map(|c| CountryRecord::new(c.name.common, c.region, c.population, c.area))
        .collect();

    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            "Skipped countries without a positive area"
        );
    }

    Ok(records)
}
