use crate::cache::{CacheKey, TtlClass};
use crate::provider::NewsQuery;

/// The news query variants the dashboard shows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NewsFeed {
    /// General precious-metals news
    General,
    /// Central banks, rates, recession
    Macro,
    /// Inflation and the dollar
    Inflation,
    /// Gold-bullish stories
    Gold,
    /// Bullish headline ticker
    Headlines,
}

impl NewsFeed {
    pub const ALL: [NewsFeed; 5] = [
        NewsFeed::General,
        NewsFeed::Macro,
        NewsFeed::Inflation,
        NewsFeed::Gold,
        NewsFeed::Headlines,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Macro => "macro",
            Self::Inflation => "inflation",
            Self::Gold => "gold",
            Self::Headlines => "headlines",
        }
    }

    /// Human readable label used in warnings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "Precious metals news",
            Self::Macro => "Macro news",
            Self::Inflation => "Inflation news",
            Self::Gold => "Gold news",
            Self::Headlines => "Headlines",
        }
    }

    fn search_expression(&self) -> &'static str {
        match self {
            Self::General => r#"gold OR silver OR "precious metals""#,
            Self::Macro => {
                r#""federal reserve" OR "interest rates" OR inflation OR recession OR "central bank""#
            }
            Self::Inflation => r#"inflation OR "US dollar" OR "dollar index" OR CPI"#,
            Self::Gold => r#""gold price" AND (rally OR surge OR record OR bullish)"#,
            Self::Headlines => {
                r#"gold AND (bullish OR rally OR record OR demand OR "central bank buying")"#
            }
        }
    }

    /// Maximum number of articles served for this feed.
    pub fn cap(&self) -> usize {
        match self {
            Self::General => 12,
            Self::Macro => 10,
            Self::Inflation => 5,
            Self::Gold => 5,
            Self::Headlines => 25,
        }
    }

    pub fn query(&self) -> NewsQuery {
        // Over-fetch so dedup losses don't leave the feed short.
        let page_size = (self.cap() * 3).min(100) as u32;
        NewsQuery {
            query: self.search_expression().to_string(),
            page_size,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        let class = match self {
            Self::General => TtlClass::GeneralNews,
            _ => TtlClass::News,
        };
        CacheKey::new(format!("news:{}", self.slug()), class)
    }
}
