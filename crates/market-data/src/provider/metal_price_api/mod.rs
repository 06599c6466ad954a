//! Metal Price API provider for precious metals spot prices.
//!
//! This provider fetches the latest gold (XAU) and silver (XAG) rates from
//! the Metal Price API in a single request. The API quotes rates as
//! "1 USD = rate troy ounces", so the price per ounce is `1 / rate`.
//!
//! Note: The API only returns a spot price. There is no previous close, so
//! day-change figures are synthesized later (see [`crate::aggregate::prices`]).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::MetalSpot;
use crate::provider::{http_client, http_client_with_timeout, MetalsProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "METAL_PRICE_API";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "METAL_PRICE_API_KEY";

const BASE_URL: &str = "https://api.metalpriceapi.com/v1";

const GOLD: &str = "XAU";
const SILVER: &str = "XAG";

/// API response from Metal Price API
#[derive(Debug, Deserialize)]
struct MetalPriceResponse {
    /// Whether the request was successful
    success: bool,
    /// Unix timestamp of the quote
    #[serde(default)]
    timestamp: Option<i64>,
    /// Rates for requested metals (1 USD = rate troy ounces)
    #[serde(default)]
    rates: HashMap<String, f64>,
    /// Present when `success` is false
    #[serde(default)]
    error: Option<MetalPriceErrorBody>,
}

#[derive(Debug, Deserialize)]
struct MetalPriceErrorBody {
    #[serde(default, alias = "info")]
    message: Option<String>,
}

/// Metal Price API provider for gold and silver spot prices.
///
/// # Example
///
/// ```ignore
/// use goldwatch_market_data::provider::metal_price_api::MetalPriceApiProvider;
///
/// let provider = MetalPriceApiProvider::new(std::env::var("METAL_PRICE_API_KEY").ok());
/// ```
pub struct MetalPriceApiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl MetalPriceApiProvider {
    /// Create a provider. A `None` key is accepted here and reported as a
    /// configuration error on each fetch.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (e.g. a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client_with_timeout(timeout);
        self
    }

    fn api_key(&self) -> Result<&str, MarketDataError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::missing_credential(PROVIDER_ID, API_KEY_VAR))
    }
}

/// Convert a "units of metal per dollar" rate into a USD price per ounce.
fn rate_to_price(rate: f64) -> Option<Decimal> {
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    Decimal::from_f64(1.0 / rate).map(|price| price.round_dp(2))
}

fn parse_spot(response: MetalPriceResponse) -> Result<MetalSpot, MarketDataError> {
    if !response.success {
        let message = response
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    let gold = response.rates.get(GOLD).copied().and_then(rate_to_price);
    let silver = response.rates.get(SILVER).copied().and_then(rate_to_price);

    if gold.is_none() && silver.is_none() {
        return Err(MarketDataError::ValidationFailed {
            message: "Response contained no usable XAU or XAG rate".to_string(),
        });
    }

    let timestamp = response
        .timestamp
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(MetalSpot {
        gold,
        silver,
        timestamp,
    })
}

#[async_trait]
impl MetalsProvider for MetalPriceApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_spot_prices(&self) -> Result<MetalSpot, MarketDataError> {
        let api_key = self.api_key()?;
        let url = format!("{}/latest", self.base_url);

        debug!("Fetching {} and {} spot prices", GOLD, SILVER);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("base", "USD"),
                ("currencies", "XAU,XAG"),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let metal_resp: MetalPriceResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("HTTP {}", status),
                });
            }
            Err(e) => {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse response: {}", e),
                });
            }
        };

        parse_spot(metal_resp)
    }
}
