//! JSON response envelopes served by the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Headline, NewsArticle, PerformanceRecord, PriceQuote};

/// Per-source slots of the prices snapshot. `None` means the source failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub gold: Option<PriceQuote>,
    pub silver: Option<PriceQuote>,
    pub sp500: Option<PriceQuote>,
    pub dow: Option<PriceQuote>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesResponse {
    pub success: bool,
    pub data: PriceSnapshot,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub success: bool,
    pub articles: Vec<NewsArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl NewsResponse {
    pub fn ok(articles: Vec<NewsArticle>, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            articles,
            last_updated: Some(Utc::now()),
            error: None,
            warnings,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            articles: Vec::new(),
            last_updated: None,
            error: Some(error),
            warnings: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    pub success: bool,
    pub headlines: Vec<Headline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub success: bool,
    pub data: Vec<PerformanceRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Default cache TTL in seconds
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_news_shape() {
        let json = serde_json::to_value(NewsResponse::failed("boom".to_string())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["articles"], serde_json::json!([]));
        assert!(json.get("lastUpdated").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_prices_shape_keeps_null_slots() {
        let response = PricesResponse {
            success: true,
            data: PriceSnapshot::default(),
            last_updated: Utc::now(),
            warnings: Vec::new(),
        };
        let json = serde_json::to_value(response).unwrap();
        let data = json["data"].as_object().unwrap();
        for key in ["gold", "silver", "sp500", "dow"] {
            assert!(data[key].is_null(), "{} should be null", key);
        }
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_health_field_name() {
        let json = serde_json::to_value(HealthResponse {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            cache_ttl: 30,
        })
        .unwrap();
        assert_eq!(json["cacheTTL"], 30);
    }
}
