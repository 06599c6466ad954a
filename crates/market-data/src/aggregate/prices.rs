//! Unified quote snapshot: gold, silver, S&P 500, Dow.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use super::envelope::{PriceSnapshot, PricesResponse};
use crate::feeds::{MarketFeeds, DOW_SYMBOL, SP500_SYMBOL};
use crate::models::PriceQuote;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gold => "XAU",
            Self::Silver => "XAG",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
        }
    }

    /// Fixed day-change percentage shown for the metal.
    ///
    /// TODO: replace with a real previous close once the metals source
    /// offers one; these constants do not track the market.
    pub fn synthetic_change_percent(&self) -> Decimal {
        match self {
            Self::Gold => Decimal::new(2, 1),
            Self::Silver => Decimal::new(5, 1),
        }
    }
}

/// Build a metal quote from a bare spot price.
///
/// The metals API has no previous close, so one is derived from the fixed
/// offset in [`Metal::synthetic_change_percent`].
pub fn metal_quote(metal: Metal, price: Option<Decimal>) -> PriceQuote {
    let change_percent = metal.synthetic_change_percent();
    let previous_close =
        price.map(|p| p * (Decimal::ONE - change_percent / Decimal::ONE_HUNDRED));
    let change = price.zip(previous_close).map(|(p, prev)| p - prev);

    PriceQuote {
        symbol: metal.symbol().to_string(),
        display_name: metal.display_name().to_string(),
        price,
        previous_close,
        change,
        change_percent: price.map(|_| change_percent),
        market_state: None,
        unit: "USD/oz".to_string(),
    }
}

/// Fetch metals and indices concurrently and merge them into one envelope.
///
/// Always reports `success: true`; failed sources leave their slots empty
/// and add a warning.
pub async fn prices(feeds: &MarketFeeds) -> PricesResponse {
    let (metals, indices) = tokio::join!(feeds.metals(), feeds.indices());

    let mut data = PriceSnapshot::default();
    let mut warnings = Vec::new();

    match metals {
        Ok(fetched) => {
            if fetched.stale {
                warnings.push("Metals prices may be stale: live source unavailable".to_string());
            }
            for (metal, price, slot) in [
                (Metal::Gold, fetched.value.gold, &mut data.gold),
                (Metal::Silver, fetched.value.silver, &mut data.silver),
            ] {
                match price {
                    Some(p) => *slot = Some(metal_quote(metal, Some(p))),
                    None => {
                        warnings.push(format!("No price returned for {}", metal.display_name()))
                    }
                }
            }
        }
        Err(e) => warnings.push(format!("Metals prices unavailable: {}", e)),
    }

    match indices {
        Ok(fetched) => {
            if fetched.stale {
                warnings.push("Stock indices may be stale: live source unavailable".to_string());
            }
            let mut quotes = fetched.value;
            for (symbol, slot) in [(SP500_SYMBOL, &mut data.sp500), (DOW_SYMBOL, &mut data.dow)] {
                match quotes.iter().position(|q| q.symbol == symbol) {
                    Some(idx) => *slot = Some(quotes.swap_remove(idx)),
                    None => warnings.push(format!("No quote returned for {}", symbol)),
                }
            }
        }
        Err(e) => warnings.push(format!("Stock indices unavailable: {}", e)),
    }

    if !warnings.is_empty() {
        info!("Prices assembled with {} warning(s)", warnings.len());
    }

    PricesResponse {
        success: true,
        data,
        last_updated: Utc::now(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::models::MetalSpot;
    use crate::testing::{gold_silver_spot, MockIndices, MockMetals, MockNews};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn feeds(metals: Arc<MockMetals>, indices: Arc<MockIndices>) -> MarketFeeds {
        MarketFeeds::new(
            Arc::new(CacheStore::default()),
            metals,
            indices,
            Arc::new(MockNews::default()),
        )
    }

    #[test]
    fn test_gold_synthetic_change() {
        let quote = metal_quote(Metal::Gold, Some(dec!(2000)));
        assert_eq!(quote.previous_close, Some(dec!(1996)));
        assert_eq!(quote.change, Some(dec!(4)));
        assert_eq!(quote.change_percent, Some(dec!(0.2)));
        assert_eq!(quote.market_state, None);
    }

    #[test]
    fn test_silver_synthetic_change() {
        let quote = metal_quote(Metal::Silver, Some(dec!(30)));
        assert_eq!(quote.previous_close, Some(dec!(29.85)));
        assert_eq!(quote.change, Some(dec!(0.15)));
        assert_eq!(quote.change_percent, Some(dec!(0.5)));
    }

    #[test]
    fn test_synthetic_change_is_not_rounded() {
        let quote = metal_quote(Metal::Gold, Some(dec!(2345.67)));
        assert_eq!(quote.previous_close, Some(dec!(2340.97866)));
        assert_eq!(quote.change, Some(dec!(4.69134)));
    }

    #[test]
    fn test_missing_price_leaves_change_empty() {
        let quote = metal_quote(Metal::Silver, None);
        assert_eq!(quote.price, None);
        assert_eq!(quote.previous_close, None);
        assert_eq!(quote.change, None);
        assert_eq!(quote.change_percent, None);
    }

    #[tokio::test]
    async fn test_all_sources_ok() {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        let response = prices(&feeds(metals, Arc::new(MockIndices::default()))).await;

        assert!(response.success);
        assert!(response.warnings.is_empty());
        assert_eq!(response.data.gold.unwrap().price, Some(dec!(2000)));
        assert_eq!(response.data.silver.unwrap().price, Some(dec!(25)));
        assert_eq!(response.data.sp500.unwrap().symbol, "^GSPC");
        assert_eq!(response.data.dow.unwrap().change, Some(dec!(-100)));
    }

    #[tokio::test]
    async fn test_one_source_failing_without_cache() {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        let indices = Arc::new(MockIndices::default());
        indices.set_failing(true);

        let response = prices(&feeds(metals, indices)).await;

        assert!(response.success);
        assert!(response.data.gold.is_some());
        assert!(response.data.silver.is_some());
        assert!(response.data.sp500.is_none());
        assert!(response.data.dow.is_none());
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].starts_with("Stock indices unavailable"));
    }

    #[tokio::test]
    async fn test_every_source_failing_still_succeeds() {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        metals.set_failing(true);
        let indices = Arc::new(MockIndices::default());
        indices.set_failing(true);

        let response = prices(&feeds(metals, indices)).await;

        assert!(response.success);
        assert_eq!(response.data, PriceSnapshot::default());
        assert_eq!(response.warnings.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_metals_are_served_with_warning() {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        let feeds = feeds(metals.clone(), Arc::new(MockIndices::default()));
        prices(&feeds).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        metals.set_failing(true);
        let response = prices(&feeds).await;

        assert!(response.success);
        assert_eq!(response.data.gold.unwrap().price, Some(dec!(2000)));
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].contains("may be stale"));
    }

    #[tokio::test]
    async fn test_missing_gold_rate_leaves_slot_empty() {
        let spot = MetalSpot {
            gold: None,
            silver: Some(dec!(25)),
            timestamp: chrono::Utc::now(),
        };
        let metals = Arc::new(MockMetals::new(spot));

        let response = prices(&feeds(metals, Arc::new(MockIndices::default()))).await;

        assert!(response.success);
        assert!(response.data.gold.is_none());
        assert_eq!(response.data.silver.as_ref().unwrap().price, Some(dec!(25)));
        assert_eq!(response.warnings, vec!["No price returned for Gold".to_string()]);

        let json = serde_json::to_value(&response.data).unwrap();
        assert!(json["gold"].is_null());
    }

    #[tokio::test]
    async fn test_missing_index_symbol_warns() {
        let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
        let indices = Arc::new(MockIndices::new(vec![crate::testing::index_quote(
            "^GSPC",
            "S&P 500",
            dec!(5000),
            dec!(10),
        )]));

        let response = prices(&feeds(metals, indices)).await;

        assert!(response.data.sp500.is_some());
        assert!(response.data.dow.is_none());
        assert_eq!(response.warnings, vec!["No quote returned for ^DJI".to_string()]);
    }
}
