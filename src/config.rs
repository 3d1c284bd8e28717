//! Process configuration, read once at startup.
//!
//! The resulting [`Config`] is immutable and handed to the upstream clients
//! when they are constructed. Nothing reads the environment after `main`.

use std::time::Duration;

use thiserror::Error;

/// Default base URL of the news provider.
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Default country-metadata endpoint, already restricted to the fields we project.
pub const DEFAULT_COUNTRIES_API_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,region,population,area";

/// Default page size forwarded to the news provider when the caller sends none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page the news provider accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default timeout for the country-metadata fetch.
pub const DEFAULT_COUNTRIES_TIMEOUT_SECS: u64 = 30;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Startup configuration failure. The service refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NEWS_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Immutable service configuration.
#[derive(Clone)]
pub struct Config {
    pub news_api_key: String,
    pub news_api_base_url: String,
    pub default_page_size: u32,
    pub countries_api_url: String,
    pub countries_timeout: Duration,
    pub port: u16,
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("news_api_key", &"<redacted>")
            .field("news_api_base_url", &self.news_api_base_url)
            .field("default_page_size", &self.default_page_size)
            .field("countries_api_url", &self.countries_api_url)
            .field("countries_timeout", &self.countries_timeout)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let news_api_key = get("NEWS_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let news_api_base_url = get("NEWS_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_NEWS_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let default_page_size = match get("DEFAULT_PAGE_SIZE") {
            Some(raw) => {
                let size: u32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DEFAULT_PAGE_SIZE",
                    value: raw.clone(),
                    reason: "not an integer",
                })?;
                if !(1..=MAX_PAGE_SIZE).contains(&size) {
                    return Err(ConfigError::InvalidValue {
                        key: "DEFAULT_PAGE_SIZE",
                        value: raw,
                        reason: "must be between 1 and 100",
                    });
                }
                size
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let countries_api_url =
            get("COUNTRIES_API_URL").unwrap_or_else(|| DEFAULT_COUNTRIES_API_URL.to_string());

        let countries_timeout = match get("COUNTRIES_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "COUNTRIES_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be a positive integer",
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_COUNTRIES_TIMEOUT_SECS),
        };

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw.clone(),
                reason: "not a valid port",
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            news_api_key,
            news_api_base_url,
            default_page_size,
            countries_api_url,
            countries_timeout,
            port,
        })
    }
}
