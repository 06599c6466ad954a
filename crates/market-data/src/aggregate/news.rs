use chrono::Utc;

use super::envelope::{HeadlinesResponse, NewsResponse};
use crate::feeds::{MarketFeeds, NewsFeed};
use crate::models::Headline;

fn stale_warning(feed: NewsFeed, stale: bool) -> Vec<String> {
    if stale {
        vec![format!("{} may be stale: live source unavailable", feed.label())]
    } else {
        Vec::new()
    }
}

/// Article list for one feed. A failed fetch with nothing cached yields
/// `success: false` and an empty list.
pub async fn news(feeds: &MarketFeeds, feed: NewsFeed) -> NewsResponse {
    match feeds.news(feed).await {
        Ok(fetched) => NewsResponse::ok(fetched.value, stale_warning(feed, fetched.stale)),
        Err(e) => NewsResponse::failed(format!("{} unavailable: {}", feed.label(), e)),
    }
}

/// Headline ticker built from the bullish gold query.
pub async fn headlines(feeds: &MarketFeeds) -> HeadlinesResponse {
    let feed = NewsFeed::Headlines;
    match feeds.news(feed).await {
        Ok(fetched) => HeadlinesResponse {
            success: true,
            headlines: fetched.value.into_iter().map(Headline::from).collect(),
            last_updated: Some(Utc::now()),
            error: None,
            warnings: stale_warning(feed, fetched.stale),
        },
        Err(e) => HeadlinesResponse {
            success: false,
            headlines: Vec::new(),
            last_updated: None,
            error: Some(format!("{} unavailable: {}", feed.label(), e)),
            warnings: Vec::new(),
        },
    }
}
