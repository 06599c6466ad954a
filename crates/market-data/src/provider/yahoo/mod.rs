//! Yahoo Finance market data provider.
//!
//! This provider uses Yahoo Finance for:
//! - Latest index quotes (e.g., ^GSPC, ^DJI) via the v7 quote API
//! - Monthly closing-price history via the chart API (yahoo_finance_api)

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use num_traits::FromPrimitive;
use reqwest::{header, Client};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{MarketState, MonthlyClose, PriceQuote};
use crate::provider::{http_client, IndexProvider, REQUEST_TIMEOUT};

use models::{YahooQuoteItem, YahooQuoteResponse};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cookie and crumb pair accepted by the v7 quote endpoint
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance provider for index quotes and history.
pub struct YahooProvider {
    client: Client,
    connector: yahoo::YahooConnector,
    crumb: RwLock<Option<CrumbData>>,
}

impl YahooProvider {
    /// Build the provider. Fails only if the history connector cannot be created.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            client: http_client(),
            connector,
            crumb: RwLock::new(None),
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Cached crumb, fetching one on first use.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = self.crumb.read().unwrap_or_else(|p| p.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Run the cookie then crumb handshake.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Session cookie
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Crumb bound to that cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = self.crumb.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Forget the crumb so the next quote request re-authenticates.
    fn clear_crumb(&self) {
        let mut guard = self.crumb.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// The history connector takes `time` timestamps.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

// ============================================================================
// IndexProvider Implementation
// ============================================================================

#[async_trait]
impl IndexProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_index_quotes(&self, symbols: &[&str]) -> Result<Vec<PriceQuote>, MarketDataError> {
        let crumb = self.ensure_crumb().await?;
        let joined = symbols.join(",");

        debug!("Fetching index quotes for {} from Yahoo", joined);

        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/quote?symbols={}&crumb={}",
            encode(&joined),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Quote request returned HTTP {}", response.status()),
            });
        }

        let data: YahooQuoteResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse quote response: {}", e),
                })?;

        parse_quotes(data)
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyClose>, MarketDataError> {
        debug!(
            "Fetching monthly history for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let start_time = Self::chrono_to_offset_datetime(start);
        let end_time = Self::chrono_to_offset_datetime(end);

        let response = tokio::time::timeout(
            REQUEST_TIMEOUT,
            self.connector
                .get_quote_history_interval(symbol, start_time, end_time, "1mo"),
        )
        .await
        .map_err(|_| MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        })?
        .map_err(|e| {
            if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                MarketDataError::SymbolNotFound(symbol.to_string())
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let yahoo_quotes = response.quotes().map_err(|e| match e {
            yahoo::YahooError::NoQuotes => MarketDataError::NoDataForRange,
            other => MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: other.to_string(),
            },
        })?;

        let closes: Vec<MonthlyClose> = yahoo_quotes
            .into_iter()
            .filter_map(|q| {
                let date = Utc.timestamp_opt(q.timestamp as i64, 0).single();
                match date {
                    Some(date) if q.close.is_finite() && q.close > 0.0 => Some(MonthlyClose {
                        date,
                        close: q.close,
                    }),
                    _ => {
                        warn!("Skipping unusable history point for {}", symbol);
                        None
                    }
                }
            })
            .collect();

        if closes.is_empty() {
            return Err(MarketDataError::NoDataForRange);
        }

        Ok(closes)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Friendly name for the indices the dashboard shows.
fn index_display_name(item: &YahooQuoteItem) -> String {
    match item.symbol.as_str() {
        "^GSPC" => "S&P 500".to_string(),
        "^DJI" => "Dow Jones".to_string(),
        "^IXIC" => "Nasdaq".to_string(),
        _ => item
            .short_name
            .clone()
            .or_else(|| item.long_name.clone())
            .unwrap_or_else(|| item.symbol.clone()),
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.filter(|v| v.is_finite()).and_then(Decimal::from_f64)
}

fn parse_quotes(data: YahooQuoteResponse) -> Result<Vec<PriceQuote>, MarketDataError> {
    if let Some(error) = data.quote_response.error.as_ref() {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: error.message(),
        });
    }

    if data.quote_response.result.is_empty() {
        return Err(MarketDataError::ValidationFailed {
            message: "Quote response contained no results".to_string(),
        });
    }

    Ok(data
        .quote_response
        .result
        .into_iter()
        .map(|item| PriceQuote {
            display_name: index_display_name(&item),
            price: to_decimal(item.regular_market_price),
            previous_close: to_decimal(item.regular_market_previous_close),
            change: to_decimal(item.regular_market_change),
            change_percent: to_decimal(item.regular_market_change_percent),
            market_state: item.market_state.as_deref().and_then(MarketState::from_yahoo),
            unit: "points".to_string(),
            symbol: item.symbol,
        })
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
