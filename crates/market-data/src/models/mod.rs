//! Market data models
//!
//! This module contains the domain types produced by the fetch layer:
//! - `quote` - Price quotes (PriceQuote, MarketState) and metals spot (MetalSpot)
//! - `news` - Provider articles (RawArticle), normalized articles (NewsArticle, Headline)
//! - `performance` - Monthly history (MonthlyClose) and return records (PerformanceRecord)

mod news;
mod performance;
mod quote;

pub use news::{Headline, NewsArticle, RawArticle};
pub use performance::{MonthlyClose, PerformanceRecord};
pub use quote::{MarketState, MetalSpot, PriceQuote};
