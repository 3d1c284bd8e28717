//! Clients for the two upstream providers this service aggregates.
//!
//! # Data Sources
//!
//! - [`restcountries`]: REST Countries - name, region, population and area per country
//! - [`newsapi`]: News API - top headlines per country and full-text article search
//!
//! Both clients are cheap to clone and hold no mutable state; each call
//! issues exactly one upstream request with no retry and no caching.

pub mod newsapi;
pub mod restcountries;

pub use newsapi::{NewsClient, SearchParams};
pub use restcountries::CountryClient;
