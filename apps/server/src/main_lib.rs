use std::sync::Arc;
use std::time::Duration;

use goldwatch_market_data::{MarketFeeds, TtlTable};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub feeds: MarketFeeds,
    /// Reported by the health endpoint
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(feeds: MarketFeeds, cache_ttl: Duration) -> Self {
        Self { feeds, cache_ttl }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let ttls = TtlTable::with_price_ttl(config.cache_ttl);
    tracing::info!(
        "Cache TTLs: prices {}s, news {}s, general news {}s, history {}s",
        ttls.prices.as_secs(),
        ttls.news.as_secs(),
        ttls.general_news.as_secs(),
        ttls.history.as_secs()
    );

    let feeds = MarketFeeds::from_credentials(
        ttls,
        config.metal_price_api_key.clone(),
        config.news_api_key.clone(),
    )?;

    Ok(Arc::new(AppState::new(feeds, config.cache_ttl)))
}
