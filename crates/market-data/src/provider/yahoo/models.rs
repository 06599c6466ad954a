//! Yahoo Finance API response models.
//!
//! These models parse the v7 `quote` endpoint, which carries previous close,
//! day change and market session alongside the last price.

use serde::Deserialize;

/// Main response wrapper for the quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteResponse {
    pub quote_response: YahooQuoteResult,
}

/// Quote result container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteResult {
    #[serde(default)]
    pub result: Vec<YahooQuoteItem>,
    #[serde(default)]
    pub error: Option<YahooErrorBody>,
}

/// Individual quote from the quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteItem {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub market_state: Option<String>,
}

/// Error object Yahoo embeds in otherwise well-formed responses
#[derive(Debug, Deserialize)]
pub struct YahooErrorBody {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl YahooErrorBody {
    pub fn message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "Unknown Yahoo error".to_string())
    }
}
