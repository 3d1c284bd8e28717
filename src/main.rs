//! Country Analytics - REST aggregator over country metadata and news.
//!
//! # API Endpoints
//!
//! - `GET /` - Service banner and endpoint index
//! - `GET /countries` - All countries with derived density
//! - `GET /countries/region/:region` - Countries in a region
//! - `GET /countries/top/:n` - Most populous countries
//! - `GET /countries/density/top/:n` - Most densely populated countries
//! - `GET /stats/region` - Per-region means
//! - `GET /news/country/:code` - Top headlines for a country
//! - `GET /news/search` - Article search
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use country_analytics::api::{AppState, router};
use country_analytics::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("country_analytics=info".parse()?))
        .init();

    // Refuse to serve without a usable configuration.
    let config = Config::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    info!(
        port = config.port,
        news_api_base_url = %config.news_api_base_url,
        countries_api_url = %config.countries_api_url,
        default_page_size = config.default_page_size,
        "Starting Country Analytics server"
    );

    let app = router(AppState::new(&config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Country Analytics is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
