//! Aggregators that turn fetcher results into the JSON envelopes served by
//! the API. Each one degrades per source rather than failing as a whole.

mod envelope;
mod news;
mod performance;
mod prices;

use std::time::Duration;

use chrono::Utc;

pub use envelope::{
    HeadlinesResponse, HealthResponse, NewsResponse, PerformanceResponse, PriceSnapshot,
    PricesResponse,
};
pub use news::{headlines, news};
pub use performance::{
    fixed_estimates, performance, total_return_percent, TrackedAsset, TRACKED_ASSETS,
};
pub use prices::{metal_quote, prices, Metal};

/// Liveness payload. Never touches upstream sources.
pub fn health(cache_ttl: Duration) -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        cache_ttl: cache_ttl.as_secs(),
    }
}
