//! In-memory response cache with per-entry TTLs and stale reads.
//!
//! Entries are never evicted. Expiry is checked when an entry is read with
//! [`CacheStore::get`]; an expired entry stays in the map and remains
//! available through [`CacheStore::get_stale`] until the key is written again.
//! The fetch layer uses that to prefer old data over no data.
//!
//! The cache is in-memory and resets on process restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default TTL for live prices (metals, indices).
pub const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(30);

/// TTL for the themed news feeds.
pub const NEWS_TTL: Duration = Duration::from_secs(600);

/// TTL for the general news feed.
pub const GENERAL_NEWS_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// TTL for monthly price history.
pub const HISTORY_TTL: Duration = Duration::from_secs(60 * 60);

/// Which TTL bucket a key belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TtlClass {
    Prices,
    News,
    GeneralNews,
    History,
}

/// TTL per class, injected into the store at construction.
#[derive(Clone, Debug)]
pub struct TtlTable {
    pub prices: Duration,
    pub news: Duration,
    pub general_news: Duration,
    pub history: Duration,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            prices: DEFAULT_PRICE_TTL,
            news: NEWS_TTL,
            general_news: GENERAL_NEWS_TTL,
            history: HISTORY_TTL,
        }
    }
}

impl TtlTable {
    /// Default table with the price TTL overridden (the `CACHE_TTL` setting).
    pub fn with_price_ttl(prices: Duration) -> Self {
        Self {
            prices,
            ..Self::default()
        }
    }

    pub fn ttl_for(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Prices => self.prices,
            TtlClass::News => self.news,
            TtlClass::GeneralNews => self.general_news,
            TtlClass::History => self.history,
        }
    }
}

/// Cache key for one upstream source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheKey {
    name: String,
    class: TtlClass,
}

impl CacheKey {
    pub fn new(name: impl Into<String>, class: TtlClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }

    pub fn metals() -> Self {
        Self::new("metals", TtlClass::Prices)
    }

    pub fn indices() -> Self {
        Self::new("indices", TtlClass::Prices)
    }

    pub fn history(symbol: &str) -> Self {
        Self::new(format!("history:{}", symbol), TtlClass::History)
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> TtlClass {
        self.class
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A stored payload and the moment it was written.
#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= self.ttl
    }
}

/// Key/value store with per-entry TTL.
///
/// Shared by handle (`Arc<CacheStore>`). Each read or write takes the lock
/// for a single map operation and never across an `.await`.
pub struct CacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttls: TtlTable,
}

impl CacheStore {
    pub fn new(ttls: TtlTable) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttls,
        }
    }

    pub fn ttls(&self) -> &TtlTable {
        &self.ttls
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Value for `key` if it was written no longer than its TTL ago.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let entries = self.read_entries();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => {
                debug!("Cache entry '{}' expired", key);
                None
            }
            None => None,
        }
    }

    /// Last value written for `key`, regardless of age.
    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.read_entries().get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
            ttl,
        };
        self.write_entries().insert(key.to_string(), entry);
    }

    /// Store `value` with the TTL configured for the key's class.
    pub fn set_for(&self, key: &CacheKey, value: Value) {
        self.set(key.as_str(), value, self.ttls.ttl_for(key.class()));
    }

    /// Number of keys ever written.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(TtlTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_value_within_ttl() {
        let cache = CacheStore::default();
        cache.set("metals", json!({"gold": 2000}), Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("metals"), Some(json!({"gold": 2000})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_aged_exactly_ttl_is_fresh() {
        let cache = CacheStore::default();
        cache.set("metals", json!(1), Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get("metals"), Some(json!(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_none_after_expiry_but_stale_read_survives() {
        let cache = CacheStore::default();
        cache.set("metals", json!({"gold": 2000}), Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get("metals"), None);
        assert_eq!(cache.get_stale("metals"), Some(json!({"gold": 2000})));

        tokio::time::advance(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(cache.get_stale("metals"), Some(json!({"gold": 2000})));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_replaces_value_and_resets_age() {
        let cache = CacheStore::default();
        cache.set("indices", json!("old"), Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;

        cache.set("indices", json!("new"), Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("indices"), Some(json!("new")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache = CacheStore::default();
        assert_eq!(cache.get("never-written"), None);
        assert_eq!(cache.get_stale("never-written"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_for_uses_ttl_table() {
        let cache = CacheStore::new(TtlTable::with_price_ttl(Duration::from_secs(5)));
        cache.set_for(&CacheKey::metals(), json!(1));
        cache.set_for(&CacheKey::history("^GSPC"), json!(2));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("metals"), None);
        assert_eq!(cache.get("history:^GSPC"), Some(json!(2)));
    }

    #[test]
    fn test_ttl_table_defaults() {
        let ttls = TtlTable::default();
        assert_eq!(ttls.ttl_for(TtlClass::Prices), Duration::from_secs(30));
        assert_eq!(ttls.ttl_for(TtlClass::News), Duration::from_secs(600));
        assert_eq!(ttls.ttl_for(TtlClass::GeneralNews), Duration::from_secs(43200));
        assert_eq!(ttls.ttl_for(TtlClass::History), Duration::from_secs(3600));
    }
}
