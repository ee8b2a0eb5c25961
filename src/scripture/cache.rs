//! # Cache Store
//!
//! A key → value map with a per-entry expiry. Every fetch path in
//! [`ContentService`](crate::service::ContentService) goes through one.
//!
//! Expiry is checked lazily: a `get` that finds a stale entry removes it and
//! reports a miss. There is no sweeper and no size bound, so entries that are
//! never read again stay in memory until [`CacheStore::clear`] or the end of the
//! process.
//!
//! Timestamps come from `tokio::time::Instant`, which lets tests pause and
//! advance the clock instead of sleeping.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// TTLs per kind of content.
pub struct CacheTtl;

impl CacheTtl {
    pub const DEFAULT: Duration = Duration::from_secs(30 * 60); // 30 min
    // Book and chapter lists barely change
    pub const CATALOG: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr
    // Search pages shift with pagination and index updates
    pub const SEARCH: Duration = Duration::from_secs(10 * 60); // 10 min
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    /// `None` when the TTL reaches past what the clock can represent.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

pub struct CacheStore<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(CacheTtl::DEFAULT)
    }
}

impl<V: Clone> CacheStore<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value if present and not expired. A stale entry is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        let entry = entries.get(key)?;
        if entry.is_live(now) {
            let age_secs = now.duration_since(entry.created_at).as_secs();
            trace!(key, age_secs, "cache hit");
            return Some(entry.value.clone());
        }

        trace!(key, "cache entry expired");
        entries.remove(key);
        None
    }

    /// Stores `value`, replacing any previous entry for `key` as a whole.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                value,
                created_at: now,
                expires_at: now.checked_add(ttl),
            },
        );
    }

    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Live entries only; expired ones are skipped but not removed.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let now = Instant::now();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn returns_values_within_ttl() {
        let cache = CacheStore::default();
        cache.set("books:kjv", vec!["GEN"], Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("books:kjv"), Some(vec!["GEN"]));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_misses_and_get_removed() {
        let cache = CacheStore::default();
        cache.set("verse:kjv:JHN.3.16", "For God so loved", Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("verse:kjv:JHN.3.16"), None);
        assert!(cache.entries.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn default_ttl_is_thirty_minutes() {
        let cache = CacheStore::default();
        cache.set_default("chapter", 1);

        tokio::time::advance(Duration::from_secs(29 * 60)).await;
        assert_eq!(cache.get("chapter"), Some(1));
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("chapter"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stats_skip_expired_entries() {
        let cache = CacheStore::default();
        cache.set("b", 2, Duration::from_secs(10));
        cache.set("a", 1, Duration::from_secs(100));
        cache.set("c", 3, Duration::from_secs(100));

        tokio::time::advance(Duration::from_secs(20)).await;
        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_ttls_never_expire() {
        let cache = CacheStore::default();
        cache.set("books:kjv", 1, Duration::from_secs(u64::MAX));
        cache.set("chapters:kjv", 2, Duration::MAX);

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert_eq!(cache.get("books:kjv"), Some(1));
        assert_eq!(cache.get("chapters:kjv"), Some(2));
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn set_replaces_and_clear_empties() {
        let cache = CacheStore::default();
        cache.set_default("k", "first");
        cache.set_default("k", "second");
        assert_eq!(cache.get("k"), Some("second"));
        assert_eq!(cache.stats().size, 1);

        cache.clear();
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
