use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading session reported for an index quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketState {
    Pre,
    Regular,
    Post,
    Closed,
}

impl MarketState {
    /// Parse Yahoo's `marketState` strings.
    ///
    /// Extended sessions (`PREPRE`, `POSTPOST`) fold into their parent session.
    pub fn from_yahoo(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "PRE" | "PREPRE" => Some(Self::Pre),
            "REGULAR" => Some(Self::Regular),
            "POST" | "POSTPOST" => Some(Self::Post),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// A normalized price quote as served to the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Source symbol (XAU, ^GSPC, ...)
    pub symbol: String,

    /// Human readable name
    pub display_name: String,

    /// Last price; absent when the source omitted it
    pub price: Option<Decimal>,

    pub previous_close: Option<Decimal>,

    pub change: Option<Decimal>,

    pub change_percent: Option<Decimal>,

    /// Session state; metals have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_state: Option<MarketState>,

    /// Unit the price is quoted in (e.g. "USD/oz", "points")
    pub unit: String,
}

/// Spot prices for the tracked metals, in USD per troy ounce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalSpot {
    pub gold: Option<Decimal>,
    pub silver: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}
