//! Data models for the country analytics service.
//!
//! Everything here is request-scoped: records are built from a fresh upstream
//! fetch, transformed, serialized into a response and dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single country, flattened from the country-metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Common English name (`name.common` upstream).
    pub country: String,

    /// Region as reported upstream (e.g. "Europe", "Americas").
    pub region: String,

    /// Population count.
    pub population: u64,

    /// Surface area in square kilometres. Always positive.
    pub area_km2: f64,

    /// Inhabitants per square kilometre, `population / area_km2`.
    pub density: f64,
}

impl CountryRecord {
    /// Build a record, deriving density from population and area.
    ///
    /// Callers must reject non-positive areas before calling this.
    pub fn new(
        country: impl Into<String>,
        region: impl Into<String>,
        population: u64,
        area_km2: f64,
    ) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
            population,
            area_km2,
            density: population as f64 / area_km2,
        }
    }
}

/// Per-region means, each rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregate {
    pub region: String,
    pub population: f64,
    pub density: f64,
    pub area_km2: f64,
}

/// Numeric column a ranking can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    Population,
    Density,
}

impl RankField {
    /// Read this field from a record.
    pub fn value(self, record: &CountryRecord) -> f64 {
        match self {
            RankField::Population => record.population as f64,
            RankField::Density => record.density,
        }
    }
}

/// A news article, passed through from the news provider untouched.
///
/// The provider owns the article shape; nothing here validates or reshapes
/// it, so missing, extra or oddly typed fields survive as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsArticle(pub Value);

/// Uniform success wrapper returned by every data endpoint.
///
/// `echo` is flattened between `status` and `results`, so its fields appear
/// at the top level of the JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T, E = NoEcho> {
    pub status: &'static str,
    #[serde(flatten)]
    pub echo: E,
    pub results: usize,
    pub data: Vec<T>,
}

impl<T> Envelope<T, NoEcho> {
    pub fn new(data: Vec<T>) -> Self {
        Self::with_echo(NoEcho {}, data)
    }
}

impl<T, E: Serialize> Envelope<T, E> {
    pub fn with_echo(echo: E, data: Vec<T>) -> Self {
        Self {
            status: "success",
            echo,
            results: data.len(),
            data,
        }
    }
}

/// Envelope echo for endpoints that echo nothing.
#[derive(Debug, Clone, Serialize)]
pub struct NoEcho {}

/// Echo for `GET /countries/region/{region}`.
#[derive(Debug, Clone, Serialize)]
pub struct RegionEcho {
    pub region: String,
}

/// Echo for `GET /news/country/{code}`.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlinesEcho {
    pub country: String,
    pub category: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

/// Echo for `GET /news/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEcho {
    pub query: String,
    pub country: Option<String>,
    pub language: String,
    pub sort_by: String,
    pub page: u32,
    pub page_size: u32,
}

/// Query parameters for `GET /news/country/{code}`.
///
/// Signed so that negative values are reported as constraint violations
/// rather than parse failures.
#[derive(Debug, Default, Deserialize)]
pub struct HeadlinesQuery {
    pub page_size: Option<i64>,
    pub page: Option<i64>,
    pub category: Option<String>,
}

/// Query parameters for `GET /news/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub country_code: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<String>,
    pub page_size: Option<i64>,
    pub page: Option<i64>,
}
