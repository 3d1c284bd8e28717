//! Country Analytics - a REST aggregator over public country metadata and a news provider.
//!
//! # Overview
//!
//! Every request triggers a fresh upstream fetch. Country data comes from
//! REST Countries and is flattened into [`model::CountryRecord`]s with a
//! derived population density; rankings and per-region means are computed
//! in memory. News requests are validated and forwarded to News API.
//!
//! Nothing is cached or persisted, and no state is shared between requests
//! beyond the immutable [`config::Config`] the clients are built from.
//!
//! # Modules
//!
//! - [`config`]: Startup configuration from the environment
//! - [`error`]: Error taxonomy and its HTTP mapping
//! - [`model`]: Records, aggregates, articles and response envelopes
//! - [`analytics`]: Filter, ranking and group-by-mean transforms
//! - [`data_sources`]: Upstream HTTP clients
//! - [`api`]: HTTP API handlers and router

pub mod analytics;
pub mod api;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod model;
