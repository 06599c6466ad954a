//! Upstream provider trait definitions.
//!
//! One trait per kind of source. The fetch layer in [`crate::feeds`] only talks
//! to these traits, so tests can swap in fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{MetalSpot, MonthlyClose, PriceQuote, RawArticle};

/// Source of precious-metal spot prices.
#[async_trait]
pub trait MetalsProvider: Send + Sync {
    /// Constant identifier like "METAL_PRICE_API", used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch current gold and silver spot prices in USD per troy ounce.
    async fn get_spot_prices(&self) -> Result<MetalSpot, MarketDataError>;
}

/// Source of equity index quotes and price history.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Fetch the latest quotes for the given symbols.
    ///
    /// Change values are passed through as the provider computed them.
    async fn get_index_quotes(&self, symbols: &[&str]) -> Result<Vec<PriceQuote>, MarketDataError>;

    /// Fetch monthly closes between `start` and `end`, ordered oldest first.
    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyClose>, MarketDataError>;
}

/// Parameters for one news search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewsQuery {
    /// Provider search expression
    pub query: String,

    /// How many articles to request before dedup
    pub page_size: u32,
}

/// Source of news articles.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Search articles, most recent first.
    async fn search_articles(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, MarketDataError>;
}
