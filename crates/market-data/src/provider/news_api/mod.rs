//! NewsAPI provider for article search.
//!
//! Uses the `/v2/everything` endpoint sorted by publish time. Articles come
//! back in provider shape ([`RawArticle`]); redaction filtering and dedup
//! happen in [`crate::feeds::dedup`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::RawArticle;
use crate::provider::{http_client, http_client_with_timeout, NewsProvider, NewsQuery};

const PROVIDER_ID: &str = "NEWS_API";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "NEWS_API_KEY";

const BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    /// "ok" or "error"
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(article: NewsApiArticle) -> Self {
        let published_at = article
            .published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        RawArticle {
            title: article.title,
            description: article.description,
            source: article.source.and_then(|s| s.name),
            url: article.url,
            image: article.url_to_image,
            published_at,
        }
    }
}

/// NewsAPI provider.
pub struct NewsApiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NewsApiProvider {
    /// Create a provider. A `None` key is reported as a configuration error
    /// on each fetch.
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

fn parse_articles(response: NewsApiResponse) -> Result<Vec<RawArticle>, MarketDataError> {
    if response.status != "ok" {
        let message = response
            .message
            .or(response.code)
            .unwrap_or_else(|| format!("status '{}'", response.status));
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    Ok(response.articles.into_iter().map(RawArticle::from).collect())
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn search_articles(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, MarketDataError> {
        let api_key = self.api_key()?;
        let url = format!("{}/everything", self.base_url);
        let page_size = query.page_size.to_string();

        debug!("Searching news for '{}'", query.query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let data: NewsApiResponse = match serde_json::from_str(&body) {
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

        parse_articles(data)
    }
}
