//! Upstream provider abstractions and implementations.
//!
//! This module contains:
//! - The provider traits the fetch layer depends on
//! - Concrete HTTP implementations (Metal Price API, Yahoo Finance, NewsAPI)
//!
//! Providers only talk to their upstream and normalize the payload. Caching,
//! stale fallback and deduplication live in [`crate::feeds`].

mod traits;

pub mod metal_price_api;
pub mod news_api;
pub mod yahoo;

use std::time::Duration;

pub use traits::{IndexProvider, MetalsProvider, NewsProvider, NewsQuery};

/// Timeout applied to every REST call made by a provider.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by a provider's calls.
pub(crate) fn http_client() -> reqwest::Client {
    http_client_with_timeout(REQUEST_TIMEOUT)
}

pub(crate) fn http_client_with_timeout(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
