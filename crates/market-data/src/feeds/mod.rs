//! Cached fetchers, one per upstream source.
//!
//! Every fetcher follows the same path:
//!
//! ```text
//!  cache.get(key) ──hit──> return (fresh)
//!        │ miss
//!        v
//!  provider call (credential check, 10s timeout) ──ok──> cache.set ──> return (fresh)
//!        │ err
//!        v
//!  cache.get_stale(key) ──some──> return (stale)
//!        │ none
//!        v
//!      error
//! ```
//!
//! The provider call and the cache write run in a spawned task. If the caller
//! goes away mid-fetch, the task still completes and warms the cache.

pub mod dedup;
mod news;

pub use news::NewsFeed;

use std::future::Future;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Months, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStore, TtlTable};
use crate::errors::MarketDataError;
use crate::models::{MetalSpot, MonthlyClose, NewsArticle, PriceQuote};
use crate::provider::metal_price_api::MetalPriceApiProvider;
use crate::provider::news_api::NewsApiProvider;
use crate::provider::yahoo::YahooProvider;
use crate::provider::{IndexProvider, MetalsProvider, NewsProvider};

/// S&P 500 symbol on Yahoo
pub const SP500_SYMBOL: &str = "^GSPC";

/// Dow Jones Industrial Average symbol on Yahoo
pub const DOW_SYMBOL: &str = "^DJI";

/// Indices shown next to the metals.
pub const INDEX_SYMBOLS: [&str; 2] = [SP500_SYMBOL, DOW_SYMBOL];

/// Length of the performance window in years.
pub const HISTORY_YEARS: u32 = 20;

/// A fetched value and whether it came from an expired cache entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub stale: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }

    pub fn stale(value: T) -> Self {
        Self { value, stale: true }
    }
}

/// The fetchers, sharing one cache.
pub struct MarketFeeds {
    cache: Arc<CacheStore>,
    metals: Arc<dyn MetalsProvider>,
    indices: Arc<dyn IndexProvider>,
    news: Arc<dyn NewsProvider>,
}

impl MarketFeeds {
    pub fn new(
        cache: Arc<CacheStore>,
        metals: Arc<dyn MetalsProvider>,
        indices: Arc<dyn IndexProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Self {
        Self {
            cache,
            metals,
            indices,
            news,
        }
    }

    /// Build the production fetchers.
    ///
    /// Missing keys are not an error here; the affected fetchers report
    /// [`MarketDataError::Configuration`] each time they miss the cache.
    pub fn from_credentials(
        ttls: TtlTable,
        metal_price_api_key: Option<String>,
        news_api_key: Option<String>,
    ) -> Result<Self, MarketDataError> {
        if metal_price_api_key.is_none() {
            warn!("Metal Price API key not configured; metals prices will be unavailable");
        }
        if news_api_key.is_none() {
            warn!("News API key not configured; news feeds will be unavailable");
        }

        Ok(Self::new(
            Arc::new(CacheStore::new(ttls)),
            Arc::new(MetalPriceApiProvider::new(metal_price_api_key)),
            Arc::new(YahooProvider::new()?),
            Arc::new(NewsApiProvider::new(news_api_key)),
        ))
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Gold and silver spot prices.
    pub async fn metals(&self) -> Result<Fetched<MetalSpot>, MarketDataError> {
        let provider = Arc::clone(&self.metals);
        self.fetch_through_cache(CacheKey::metals(), async move {
            provider.get_spot_prices().await
        })
        .await
    }

    /// Latest quotes for [`INDEX_SYMBOLS`].
    pub async fn indices(&self) -> Result<Fetched<Vec<PriceQuote>>, MarketDataError> {
        let provider = Arc::clone(&self.indices);
        self.fetch_through_cache(CacheKey::indices(), async move {
            provider.get_index_quotes(&INDEX_SYMBOLS).await
        })
        .await
    }

    /// Deduplicated articles for one news feed.
    pub async fn news(&self, feed: NewsFeed) -> Result<Fetched<Vec<NewsArticle>>, MarketDataError> {
        let provider = Arc::clone(&self.news);
        let query = feed.query();
        let cap = feed.cap();
        self.fetch_through_cache(feed.cache_key(), async move {
            let raw = provider.search_articles(&query).await?;
            Ok(dedup::normalize_articles(raw, cap))
        })
        .await
    }

    /// Monthly closes for `symbol` over the last [`HISTORY_YEARS`] years.
    pub async fn history(&self, symbol: &str) -> Result<Fetched<Vec<MonthlyClose>>, MarketDataError> {
        let provider = Arc::clone(&self.indices);
        let owned_symbol = symbol.to_string();
        self.fetch_through_cache(CacheKey::history(symbol), async move {
            let end = Utc::now();
            let start = end
                .checked_sub_months(Months::new(HISTORY_YEARS * 12))
                .unwrap_or_else(|| end - ChronoDuration::days(HISTORY_YEARS as i64 * 365));
            provider.get_monthly_closes(&owned_symbol, start, end).await
        })
        .await
    }

    async fn fetch_through_cache<T, Fut>(
        &self,
        key: CacheKey,
        upstream: Fut,
    ) -> Result<Fetched<T>, MarketDataError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        Fut: Future<Output = Result<T, MarketDataError>> + Send + 'static,
    {
        if let Some(cached) = self.cache.get(key.as_str()) {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    debug!("Cache hit for '{}'", key);
                    return Ok(Fetched::fresh(value));
                }
                Err(e) => warn!("Ignoring undecodable cache entry '{}': {}", key, e),
            }
        }

        debug!("Cache miss for '{}', fetching upstream", key);

        let cache = Arc::clone(&self.cache);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let value = upstream.await?;
            cache.set_for(&task_key, serde_json::to_value(&value)?);
            Ok::<T, MarketDataError>(value)
        });

        let outcome = match task.await {
            Ok(result) => result,
            Err(e) => Err(MarketDataError::TaskFailed(e.to_string())),
        };

        match outcome {
            Ok(value) => Ok(Fetched::fresh(value)),
            Err(err) => {
                let stale = self
                    .cache
                    .get_stale(key.as_str())
                    .and_then(|v| serde_json::from_value::<T>(v).ok());
                match stale {
                    Some(value) => {
                        warn!(
                            "Fetch for '{}' failed ({} error: {}), serving stale data",
                            key,
                            err.kind(),
                            err
                        );
                        Ok(Fetched::stale(value))
                    }
                    None => {
                        warn!(
                            "Fetch for '{}' failed ({} error: {}), nothing cached",
                            key,
                            err.kind(),
                            err
                        );
                        Err(err)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::models::RawArticle;
    use crate::testing::{gold_silver_spot, MockIndices, MockMetals, MockNews};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    struct Fixture {
        feeds: MarketFeeds,
        metals: Arc<MockMetals>,
        indices: Arc<MockIndices>,
        news: Arc<MockNews>,
    }

    fn fixture() -> Fixture {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        let indices = Arc::new(MockIndices::default());
        let news = Arc::new(MockNews::default());
        let feeds = MarketFeeds::new(
            Arc::new(CacheStore::default()),
            metals.clone(),
            indices.clone(),
            news.clone(),
        );
        Fixture {
            feeds,
            metals,
            indices,
            news,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_still_fills_cache() {
        let Fixture { feeds, metals, .. } = fixture();
        metals.set_delay(Duration::from_millis(100));
        let feeds = Arc::new(feeds);

        let caller = tokio::spawn({
            let feeds = Arc::clone(&feeds);
            async move { feeds.metals().await }
        });
        tokio::task::yield_now().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(feeds.cache().get("metals").is_some());
        let fetched = feeds.metals().await.unwrap();
        assert!(!fetched.stale);
        assert_eq!(fetched.value.gold, Some(dec!(2000)));
        assert_eq!(metals.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_provider() {
        let fx = fixture();

        let first = fx.feeds.metals().await.unwrap();
        let second = fx.feeds.metals().await.unwrap();

        assert!(!first.stale);
        assert_eq!(first, second);
        assert_eq!(fx.metals.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let fx = fixture();
        fx.feeds.metals().await.unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;
        fx.feeds.metals().await.unwrap();

        assert_eq!(fx.metals.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_success_serves_stale() {
        let fx = fixture();
        fx.feeds.metals().await.unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;
        fx.metals.set_failing(true);

        let fetched = fx.feeds.metals().await.unwrap();
        assert!(fetched.stale);
        assert_eq!(fetched.value.gold, Some(dec!(2000)));
    }

    #[tokio::test]
    async fn test_failure_without_cache_propagates() {
        let fx = fixture();
        fx.metals.set_failing(true);

        let err = fx.feeds.metals().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Upstream);
        assert!(fx.feeds.cache().get_stale("metals").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credential_falls_back_to_stale() {
        let fx = fixture();
        fx.feeds.metals().await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;

        fx.metals.set_unconfigured(true);
        let fetched = fx.feeds.metals().await.unwrap();
        assert!(fetched.stale);
    }

    #[tokio::test]
    async fn test_news_is_deduplicated_and_capped() {
        let fx = fixture();
        let mut raw = vec![
            RawArticle {
                title: Some("Fed holds rates steady".to_string()),
                ..Default::default()
            },
            RawArticle {
                title: Some("FED HOLDS RATES STEADY!".to_string()),
                ..Default::default()
            },
        ];
        for i in 0..20 {
            raw.push(RawArticle {
                title: Some(format!("Macro story {}", i)),
                ..Default::default()
            });
        }
        fx.news.set_articles(raw);

        let fetched = fx.feeds.news(NewsFeed::Macro).await.unwrap();
        assert_eq!(fetched.value.len(), NewsFeed::Macro.cap());
        assert_eq!(fetched.value[0].title, "Fed holds rates steady");
        assert_eq!(fetched.value[1].title, "Macro story 0");
    }

    #[tokio::test]
    async fn test_news_feeds_cache_independently() {
        let fx = fixture();
        fx.feeds.news(NewsFeed::Macro).await.unwrap();
        fx.feeds.news(NewsFeed::Gold).await.unwrap();
        fx.feeds.news(NewsFeed::Macro).await.unwrap();

        assert_eq!(fx.news.calls(), 2);
    }

    #[tokio::test]
    async fn test_history_cached_per_symbol() {
        let fx = fixture();
        fx.indices.set_history("^GSPC", vec![100.0, 250.0]);
        fx.indices.set_history("^DJI", vec![100.0, 150.0]);

        let sp = fx.feeds.history("^GSPC").await.unwrap();
        fx.feeds.history("^DJI").await.unwrap();
        fx.feeds.history("^GSPC").await.unwrap();

        assert_eq!(sp.value.len(), 2);
        assert_eq!(fx.indices.history_calls(), 2);
        assert!(fx.feeds.history("UNKNOWN").await.is_err());
    }

    #[tokio::test]
    async fn test_indices_request_tracked_symbols() {
        let fx = fixture();
        let fetched = fx.feeds.indices().await.unwrap();
        let symbols: Vec<_> = fetched.value.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, INDEX_SYMBOLS.to_vec());
    }
}
