//! Response cache and clock seams.
//!
//! The cache stores raw response bodies keyed by request identity, with an
//! absolute expiry epoch. The invoker treats an expired or absent entry the
//! same as a miss. `MemoryCache` is the in-process default; a persistent
//! backend can implement [`CacheStore`] and outlive the client instance.

use std::collections::HashMap;

/// A cached raw response body with its absolute expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload: String,
    pub expires_at: i64,
}

/// Key-value store for raw response bodies.
pub trait CacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn set(&mut self, key: &str, payload: &str, expires_at: i64);
}

/// In-memory cache backend. Entries are never evicted; expiry is enforced
/// by the reader.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, payload: &str, expires_at: i64) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload: payload.to_string(),
                expires_at,
            },
        );
    }
}

/// Epoch-seconds time source, swappable in tests.
pub trait Clock {
    fn now_epoch(&self) -> i64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock pinned to a fixed instant, for exercising cache expiry in tests.
#[derive(Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cache_round_trips_entries() {
        let mut cache = MemoryCache::new();
        cache.set("k", "payload", 1_000);
        assert_eq!(
            cache.get("k"),
            Some(CacheEntry {
                payload: "payload".to_string(),
                expires_at: 1_000
            })
        );
    }

    #[test]
    fn memory_cache_miss_on_unknown_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn memory_cache_overwrites_existing_key() {
        let mut cache = MemoryCache::new();
        cache.set("k", "old", 100);
        cache.set("k", "new", 200);
        let entry = cache.get("k").unwrap();
        assert_eq!(entry.payload, "new");
        assert_eq!(entry.expires_at, 200);
    }

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        assert_eq!(FixedClock(42).now_epoch(), 42);
    }
}
