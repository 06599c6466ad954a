//! Long-horizon asset performance comparison.

use futures::future::join_all;
use tracing::{debug, warn};

use super::envelope::PerformanceResponse;
use crate::feeds::MarketFeeds;
use crate::models::{MonthlyClose, PerformanceRecord};

/// An asset charted from market history.
#[derive(Clone, Copy, Debug)]
pub struct TrackedAsset {
    pub name: &'static str,
    pub symbol: &'static str,
    pub color: &'static str,
}

pub const TRACKED_ASSETS: [TrackedAsset; 6] = [
    TrackedAsset {
        name: "Gold",
        symbol: "GC=F",
        color: "#D4AF37",
    },
    TrackedAsset {
        name: "Silver",
        symbol: "SI=F",
        color: "#C0C0C0",
    },
    TrackedAsset {
        name: "S&P 500",
        symbol: "^GSPC",
        color: "#3B82F6",
    },
    TrackedAsset {
        name: "Dow Jones",
        symbol: "^DJI",
        color: "#6366F1",
    },
    TrackedAsset {
        name: "Nasdaq",
        symbol: "^IXIC",
        color: "#8B5CF6",
    },
    TrackedAsset {
        name: "Real Estate",
        symbol: "VNQ",
        color: "#10B981",
    },
];

/// Assets without a market series, shown with fixed estimates.
pub fn fixed_estimates() -> Vec<PerformanceRecord> {
    [("CDs/Savings", 38, "#F59E0B"), ("Cash", 0, "#6B7280")]
        .into_iter()
        .map(|(name, pct, color)| PerformanceRecord {
            color: Some(color.to_string()),
            ..PerformanceRecord::new(name, pct)
        })
        .collect()
}

/// Total return from the first to the last close, rounded to whole percent.
///
/// Returns `None` for fewer than two points or a non-positive starting close.
pub fn total_return_percent(closes: &[MonthlyClose]) -> Option<i64> {
    if closes.len() < 2 {
        return None;
    }
    let first = closes.first()?.close;
    let last = closes.last()?.close;
    if !first.is_finite() || first <= 0.0 || !last.is_finite() {
        return None;
    }
    // Halves round up, so -50.5 becomes -50.
    Some(((last - first) / first * 100.0 + 0.5).floor() as i64)
}

/// Fetch every tracked series in parallel and rank by return, descending.
///
/// Assets whose history cannot be fetched are left out of the result.
pub async fn performance(feeds: &MarketFeeds) -> PerformanceResponse {
    let fetches = TRACKED_ASSETS.iter().map(|asset| async move {
        let result = feeds.history(asset.symbol).await;
        (asset, result)
    });

    let mut data = Vec::with_capacity(TRACKED_ASSETS.len() + 2);
    for (asset, result) in join_all(fetches).await {
        match result {
            Ok(fetched) => match total_return_percent(&fetched.value) {
                Some(pct) => data.push(PerformanceRecord {
                    color: Some(asset.color.to_string()),
                    ..PerformanceRecord::new(asset.name, pct)
                }),
                None => debug!(
                    "Not enough history for {} ({} points)",
                    asset.symbol,
                    fetched.value.len()
                ),
            },
            Err(e) => warn!("Dropping {} from performance: {}", asset.name, e),
        }
    }

    data.extend(fixed_estimates());
    data.sort_by(|a, b| b.return_percent.cmp(&a.return_percent));

    PerformanceResponse {
        success: true,
        data,
    }
}
