//! Goldwatch Market Data Crate
//!
//! Fetches precious-metals spot prices, stock index quotes, financial news
//! and long-range price history, and assembles them into the envelopes
//! served by the Goldwatch API.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |    Aggregate     |  prices / news / headlines / performance envelopes
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   MarketFeeds    | --> |    CacheStore    |  per-key TTL, stale reads
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |    Providers     |  Metal Price API, Yahoo Finance, NewsAPI
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CacheStore`] - In-memory store keyed by string, with stale reads
//! - [`MarketFeeds`] - One cached fetcher per upstream source
//! - [`NewsFeed`] - The news query variants
//! - [`PriceQuote`], [`NewsArticle`], [`PerformanceRecord`] - Served data
//! - [`MarketDataError`] - Fetch failures, classified by [`FailureKind`]
//!
//! # Degradation
//!
//! A failed upstream call falls back to the last cached value regardless of
//! age. Aggregators keep going when one source is down and report it in a
//! `warnings` list instead of failing the response.

pub mod aggregate;
pub mod cache;
pub mod errors;
pub mod feeds;
pub mod models;
pub mod provider;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use cache::{CacheKey, CacheStore, TtlClass, TtlTable};
pub use errors::{FailureKind, MarketDataError};
pub use feeds::{Fetched, MarketFeeds, NewsFeed};
pub use models::{
    Headline, MarketState, MetalSpot, MonthlyClose, NewsArticle, PerformanceRecord, PriceQuote,
    RawArticle,
};

pub use provider::metal_price_api::MetalPriceApiProvider;
pub use provider::news_api::NewsApiProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{IndexProvider, MetalsProvider, NewsProvider, NewsQuery};
