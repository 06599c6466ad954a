use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of monthly closing-price history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyClose {
    pub date: DateTime<Utc>,
    pub close: f64,
}

/// Long-horizon total return for one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub asset_name: String,

    /// Total return over the window, rounded to a whole percent
    pub return_percent: i64,

    /// Chart color; assigned when the response is assembled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PerformanceRecord {
    pub fn new(asset_name: impl Into<String>, return_percent: i64) -> Self {
        Self {
            asset_name: asset_name.into(),
            return_percent,
            color: None,
        }
    }
}
