//! HTTP API handlers.
//!
//! Every handler follows the same shape: validate its inputs, make one fresh
//! upstream call, optionally run an analytics transform, and wrap the rows in
//! an [`Envelope`]. Failures are [`Error`]s, rendered as `{"detail": ...}`
//! with the status from [`Error::status_code`].

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use crate::analytics::{filter_by_region, region_means, top_n};
use crate::config::{Config, MAX_PAGE_SIZE};
use crate::data_sources::{CountryClient, NewsClient, SearchParams};
use crate::error::{Error, Result, ResultExt};
use crate::model::{
    CountryRecord, Envelope, HeadlinesEcho, HeadlinesQuery, NewsArticle, RankField,
    RegionAggregate, RegionEcho, SearchEcho, SearchQuery,
};

/// Largest `n` accepted by the ranking endpoints.
pub const MAX_TOP_N: i64 = 50;

/// Application state shared across handlers.
///
/// Holds only immutable upstream clients; handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub countries: CountryClient,
    pub news: NewsClient,
}

impl AppState {
    /// Build the upstream clients from startup configuration.
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            countries: CountryClient::new(&config.countries_api_url, config.countries_timeout)?,
            news: NewsClient::new(config)?,
        })
    }
}

/// Build the full router with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/countries", get(all_countries))
        .route("/countries/region/:region", get(countries_by_region))
        .route("/countries/top/:n", get(top_by_population))
        .route("/countries/density/top/:n", get(top_by_density))
        .route("/stats/region", get(region_stats))
        .route("/news/country/:code", get(country_news))
        .route("/news/search", get(search_news))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// GET / - Service banner and endpoint index.
pub async fn home() -> Json<Value> {
    Json(json!({
        "message": "Country Analytics API is running",
        "endpoints": {
            "countries": "/countries",
            "countries_by_region": "/countries/region/{region}",
            "top_population": "/countries/top/{n}",
            "top_density": "/countries/density/top/{n}",
            "region_stats": "/stats/region",
            "country_news": "/news/country/{country_code}",
            "search_news": "/news/search"
        }
    }))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

// ============================================================================
// Country handlers
// ============================================================================

/// GET /countries - Every country with derived density.
#[instrument(skip(state))]
pub async fn all_countries(State(state): State<AppState>) -> Result<Json<Envelope<CountryRecord>>> {
    let records = state
        .countries
        .fetch_countries()
        .await
        .context("Error fetching country data")
        .inspect_err(|e| warn!(error = %e, "Failed to fetch countries"))?;

    info!(results = records.len(), "Countries listed");
    Ok(Json(Envelope::new(records)))
}

/// GET /countries/region/:region - Countries in one region (case-insensitive).
///
/// Responds `404` when the region matches nothing.
#[instrument(skip(state))]
pub async fn countries_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Envelope<CountryRecord, RegionEcho>>> {
    let records = state
        .countries
        .fetch_countries()
        .await
        .context("Error processing request")
        .inspect_err(|e| warn!(error = %e, "Failed to fetch countries"))?;

    let matching = filter_by_region(&records, &region);
    if matching.is_empty() {
        info!(region = %region, "No countries in region");
        return Err(Error::NotFound(format!(
            "No countries found in region: {}",
            region
        )));
    }

    info!(region = %region, results = matching.len(), "Countries filtered by region");
    Ok(Json(Envelope::with_echo(RegionEcho { region }, matching)))
}

/// GET /countries/top/:n - The `n` most populous countries, `1 <= n <= 50`.
#[instrument(skip(state))]
pub async fn top_by_population(
    State(state): State<AppState>,
    Path(n): Path<String>,
) -> Result<Json<Envelope<CountryRecord>>> {
    ranked(&state, &n, RankField::Population).await
}

/// GET /countries/density/top/:n - The `n` most densely populated countries.
#[instrument(skip(state))]
pub async fn top_by_density(
    State(state): State<AppState>,
    Path(n): Path<String>,
) -> Result<Json<Envelope<CountryRecord>>> {
    ranked(&state, &n, RankField::Density).await
}

async fn ranked(
    state: &AppState,
    raw_n: &str,
    field: RankField,
) -> Result<Json<Envelope<CountryRecord>>> {
    // Checked before touching the upstream.
    let n = parse_top_n(raw_n)?;

    let records = state
        .countries
        .fetch_countries()
        .await
        .context("Error processing request")
        .inspect_err(|e| warn!(error = %e, "Failed to fetch countries"))?;

    let top = top_n(&records, field, n);
    info!(?field, n, results = top.len(), "Countries ranked");
    Ok(Json(Envelope::new(top)))
}

/// GET /stats/region - Mean population, density and area per region.
#[instrument(skip(state))]
pub async fn region_stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<RegionAggregate>>> {
    let records = state
        .countries
        .fetch_countries()
        .await
        .context("Error processing request")
        .inspect_err(|e| warn!(error = %e, "Failed to fetch countries"))?;

    let stats = region_means(&records);
    info!(results = stats.len(), "Region statistics computed");
    Ok(Json(Envelope::new(stats)))
}

// ============================================================================
// News handlers
// ============================================================================

/// GET /news/country/:code - Top headlines for a country.
///
/// # Query Parameters
///
/// - `page_size` (optional): 1 to 100, defaults to the configured page size
/// - `page` (optional): 1-based, default 1
/// - `category` (optional): business, entertainment, general, health, science, sports, technology
///
/// A country code that is not exactly two characters yields `400`.
#[instrument(skip(state, query))]
pub async fn country_news(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: std::result::Result<Query<HeadlinesQuery>, QueryRejection>,
) -> Result<Json<Envelope<NewsArticle, HeadlinesEcho>>> {
    let Query(query) = query.map_err(rejected)?;
    let page_size = page_size_param(query.page_size)?;
    let page = page_param(query.page)?;
    let category = query.category.filter(|c| !c.is_empty());

    let articles = state
        .news
        .fetch_headlines(&code, page_size, page, category.as_deref())
        .await
        .context("Error fetching news")
        .inspect_err(|e| warn!(country = %code, error = %e, "Failed to fetch headlines"))?;

    info!(country = %code, results = articles.len(), "Headlines fetched");
    let echo = HeadlinesEcho {
        country: code.to_uppercase(),
        category,
        page,
        page_size: state.news.effective_page_size(page_size),
    };
    Ok(Json(Envelope::with_echo(echo, articles)))
}

/// GET /news/search - Full-text article search.
///
/// # Query Parameters
///
/// - `query` (required): at least 2 characters
/// - `country_code` (optional): exactly 2 characters
/// - `language` (optional): default `en`
/// - `sort_by` (optional): `publishedAt` (default), `popularity` or `relevancy`
/// - `page_size` (optional): 1 to 100
/// - `page` (optional): 1-based, default 1
#[instrument(skip(state, query))]
pub async fn search_news(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Envelope<NewsArticle, SearchEcho>>> {
    let Query(query) = query.map_err(rejected)?;

    let text = query
        .query
        .ok_or_else(|| Error::Validation("query: field required".to_string()))?;
    if text.chars().count() < 2 {
        return Err(Error::Validation(
            "query: must be at least 2 characters".to_string(),
        ));
    }
    let country_code = query.country_code.filter(|c| !c.is_empty());
    if let Some(code) = &country_code {
        if code.chars().count() != 2 {
            return Err(Error::Validation(
                "country_code: must be exactly 2 characters".to_string(),
            ));
        }
    }
    let language = query.language.unwrap_or_else(|| "en".to_string());
    let sort_by = query.sort_by.unwrap_or_else(|| "publishedAt".to_string());
    let page_size = page_size_param(query.page_size)?;
    let page = page_param(query.page)?;

    let params = SearchParams {
        query: &text,
        country_code: country_code.as_deref(),
        language: &language,
        sort_by: &sort_by,
        page_size,
        page,
    };
    let articles = state
        .news
        .search_news(&params)
        .await
        .context("Error searching news")
        .inspect_err(|e| warn!(query = %text, error = %e, "Failed to search news"))?;

    info!(query = %text, results = articles.len(), "News searched");
    let echo = SearchEcho {
        page_size: state.news.effective_page_size(page_size),
        query: text,
        country: country_code.map(|c| c.to_uppercase()),
        language,
        sort_by,
        page,
    };
    Ok(Json(Envelope::with_echo(echo, articles)))
}

// ============================================================================
// Parameter validation
// ============================================================================

fn parse_top_n(raw: &str) -> Result<usize> {
    let n: i64 = raw
        .parse()
        .map_err(|_| Error::Validation(format!("n: expected an integer, got {:?}", raw)))?;
    if !(1..=MAX_TOP_N).contains(&n) {
        return Err(Error::Validation(format!(
            "n: must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(n as usize)
}

fn page_size_param(value: Option<i64>) -> Result<Option<u32>> {
    match value {
        None => Ok(None),
        Some(v) if (1..=i64::from(MAX_PAGE_SIZE)).contains(&v) => Ok(Some(v as u32)),
        Some(_) => Err(Error::Validation(format!(
            "page_size: must be between 1 and {}",
            MAX_PAGE_SIZE
        ))),
    }
}

fn page_param(value: Option<i64>) -> Result<u32> {
    match value {
        None => Ok(1),
        Some(v) if v >= 1 => u32::try_from(v)
            .map_err(|_| Error::Validation("page: value too large".to_string())),
        Some(_) => Err(Error::Validation("page: must be at least 1".to_string())),
    }
}

fn rejected(rejection: QueryRejection) -> Error {
    Error::Validation(rejection.body_text())
}
