//! TTL Store Module
//!
//! String-keyed map of expiring values with a capacity bound.

use std::collections::HashMap;

use crate::cache::{CacheStats, Expiring};

// == TTL Store ==
/// Keyed storage with TTL expiry and soonest-to-expire eviction.
#[derive(Debug)]
pub struct TtlStore<V> {
    entries: HashMap<String, Expiring<V>>,
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl<V: Clone> TtlStore<V> {
    /// Creates a new store with the given capacity and default TTL in seconds.
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value, resetting its TTL if the key already exists.
    ///
    /// When the store is full, expired entries are purged first; if it is
    /// still full, the entry closest to expiry is evicted.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<u64>) {
        if self.max_entries == 0 {
            return;
        }

        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_soonest();
            }
        }

        let entry = Expiring::new(value, Some(ttl.unwrap_or(self.default_ttl)));
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a live value. Expired entries are dropped and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_soonest(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at.unwrap_or(i64::MAX))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.stats.record_eviction();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_set_and_get() {
        let mut store = TtlStore::new(10, 300);

        store.set("posts", "payload".to_string(), None);

        assert_eq!(store.get("posts"), Some("payload".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_missing_counts_miss() {
        let mut store: TtlStore<String> = TtlStore::new(10, 300);

        assert!(store.get("missing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = TtlStore::new(10, 300);
        store.set("discounts", 7u32, Some(1));

        assert_eq!(store.get("discounts"), Some(7));

        sleep(Duration::from_millis(1100));

        assert!(store.get("discounts").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_evicts_soonest_expiry_when_full() {
        let mut store = TtlStore::new(2, 300);
        store.set("short", 1u32, Some(10));
        store.set("long", 2u32, Some(1000));

        store.set("new", 3u32, None);

        assert_eq!(store.len(), 2);
        assert!(store.get("short").is_none());
        assert_eq!(store.get("long"), Some(2));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_overwrite_does_not_evict() {
        let mut store = TtlStore::new(1, 300);
        store.set("post:hello", 1u32, None);
        store.set("post:hello", 2u32, None);

        assert_eq!(store.get("post:hello"), Some(2));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = TtlStore::new(10, 300);
        store.set("a", 1u32, Some(1));
        store.set("b", 2u32, Some(10));

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b"), Some(2));
    }

    #[test]
    fn test_store_zero_capacity_stores_nothing() {
        let mut store = TtlStore::new(0, 300);
        store.set("a", 1u32, None);
        assert!(store.is_empty());
    }
}
