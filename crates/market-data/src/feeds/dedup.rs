//! Article normalization shared by every news feed.
//!
//! Providers return near-duplicate stories (the same wire piece syndicated by
//! several outlets) and redacted placeholders. This module drops both and
//! projects the survivors onto [`NewsArticle`].

use std::collections::HashSet;

use crate::models::{NewsArticle, RawArticle};

/// Number of normalized title characters that identify a story.
pub const TITLE_KEY_LEN: usize = 50;

/// Title NewsAPI substitutes for articles it has taken down.
const REDACTED_TITLE: &str = "[Removed]";

/// Key used to spot duplicate stories: lowercase ASCII letters and digits of
/// the title, truncated to [`TITLE_KEY_LEN`] characters.
pub fn title_key(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(TITLE_KEY_LEN)
        .collect()
}

fn usable_title(title: Option<&str>) -> Option<&str> {
    let title = title?.trim();
    if title.is_empty() || title == REDACTED_TITLE {
        None
    } else {
        Some(title)
    }
}

/// Filter, dedup and project raw articles, keeping at most `cap` of them.
///
/// Order of first occurrence is preserved.
pub fn normalize_articles(raw: Vec<RawArticle>, cap: usize) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for article in raw {
        if articles.len() >= cap {
            break;
        }

        let Some(title) = usable_title(article.title.as_deref()) else {
            continue;
        };

        if !seen.insert(title_key(title)) {
            continue;
        }

        articles.push(NewsArticle {
            title: title.to_string(),
            description: article.description.unwrap_or_default(),
            source: article.source.unwrap_or_else(|| "Unknown".to_string()),
            url: article.url.unwrap_or_default(),
            image: article.image.filter(|i| !i.is_empty()),
            published_at: article.published_at,
        });
    }

    articles
}
