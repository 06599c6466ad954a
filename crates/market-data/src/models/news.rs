use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article as delivered by a news provider, before normalization.
///
/// Every field is optional because providers routinely omit or redact them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// A normalized news article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Compact projection used by the headline ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<NewsArticle> for Headline {
    fn from(article: NewsArticle) -> Self {
        Self {
            title: article.title,
            source: article.source,
            url: article.url,
            published_at: article.published_at,
        }
    }
}
