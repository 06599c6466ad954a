//! In-memory providers for tests.
//!
//! Each mock counts its calls and can be switched into a failing state at
//! runtime, so tests can warm the cache and then take the source down.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{MarketState, MetalSpot, MonthlyClose, PriceQuote, RawArticle};
use crate::provider::{IndexProvider, MetalsProvider, NewsProvider, NewsQuery};

fn simulated_outage(provider: &str) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: provider.to_string(),
        message: "simulated outage".to_string(),
    }
}

/// Spot payload with both metals priced.
pub fn gold_silver_spot(gold: Decimal, silver: Decimal) -> MetalSpot {
    MetalSpot {
        gold: Some(gold),
        silver: Some(silver),
        timestamp: Utc::now(),
    }
}

/// Index quote with the given price and change figures.
pub fn index_quote(symbol: &str, name: &str, price: Decimal, change: Decimal) -> PriceQuote {
    PriceQuote {
        symbol: symbol.to_string(),
        display_name: name.to_string(),
        price: Some(price),
        previous_close: Some(price - change),
        change: Some(change),
        change_percent: None,
        market_state: Some(MarketState::Regular),
        unit: "points".to_string(),
    }
}

pub struct MockMetals {
    spot: MetalSpot,
    failing: AtomicBool,
    unconfigured: AtomicBool,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MockMetals {
    pub fn new(spot: MetalSpot) -> Self {
        Self {
            spot,
            failing: AtomicBool::new(false),
            unconfigured: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            delay: Mutex::new(None),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold each response for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Behave as if the API key were missing.
    pub fn set_unconfigured(&self, unconfigured: bool) {
        self.unconfigured.store(unconfigured, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetalsProvider for MockMetals {
    fn id(&self) -> &'static str {
        "MOCK_METALS"
    }

    async fn get_spot_prices(&self) -> Result<MetalSpot, MarketDataError> {
        if self.unconfigured.load(Ordering::SeqCst) {
            return Err(MarketDataError::missing_credential(
                self.id(),
                "METAL_PRICE_API_KEY",
            ));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(simulated_outage(self.id()));
        }
        Ok(self.spot.clone())
    }
}

pub struct MockIndices {
    quotes: Vec<PriceQuote>,
    history: Mutex<HashMap<String, Vec<f64>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl MockIndices {
    pub fn new(quotes: Vec<PriceQuote>) -> Self {
        Self {
            quotes,
            history: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
        }
    }

    /// Quotes fail while set; history is unaffected.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Register monthly closes for a symbol. Unregistered symbols fail.
    pub fn set_history(&self, symbol: &str, closes: Vec<f64>) {
        self.history
            .lock()
            .unwrap()
            .insert(symbol.to_string(), closes);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIndices {
    fn default() -> Self {
        Self::new(vec![
            index_quote(
                "^GSPC",
                "S&P 500",
                Decimal::new(500_000, 2),
                Decimal::new(2_500, 2),
            ),
            index_quote(
                "^DJI",
                "Dow Jones",
                Decimal::new(3_900_000, 2),
                Decimal::new(-10_000, 2),
            ),
        ])
    }
}

#[async_trait]
impl IndexProvider for MockIndices {
    fn id(&self) -> &'static str {
        "MOCK_INDICES"
    }

    async fn get_index_quotes(&self, symbols: &[&str]) -> Result<Vec<PriceQuote>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(simulated_outage(self.id()));
        }
        Ok(self
            .quotes
            .iter()
            .filter(|q| symbols.contains(&q.symbol.as_str()))
            .cloned()
            .collect())
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyClose>, MarketDataError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let closes = self
            .history
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| MonthlyClose {
                date: start
                    .checked_add_months(Months::new(i as u32))
                    .unwrap_or(start),
                close,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MockNews {
    articles: Mutex<Vec<RawArticle>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockNews {
    pub fn new(articles: Vec<RawArticle>) -> Self {
        Self {
            articles: Mutex::new(articles),
            ..Default::default()
        }
    }

    pub fn set_articles(&self, articles: Vec<RawArticle>) {
        *self.articles.lock().unwrap() = articles;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for MockNews {
    fn id(&self) -> &'static str {
        "MOCK_NEWS"
    }

    async fn search_articles(&self, _query: &NewsQuery) -> Result<Vec<RawArticle>, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(simulated_outage(self.id()));
        }
        Ok(self.articles.lock().unwrap().clone())
    }
}
