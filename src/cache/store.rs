//! Cache Store Module
//!
//! HashMap-backed storage with TTL expiration and a capacity bound.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Error ==
/// Failures of the underlying store.
///
/// These never reach a client: callers log them and carry on as if the
/// lookup had missed.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store is at capacity and no expired entry could be reclaimed
    #[error("cache is full ({0} entries)")]
    Full(usize),
}

// == Cache Store ==
/// Main cache storage with TTL expiry and hit/miss accounting.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl CacheStore {
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Put ==
    /// Stores a value under `key`, expiring after `ttl_seconds`.
    ///
    /// An existing entry under the same key is replaced wholesale and its
    /// TTL restarts. At capacity, expired entries are swept first; if the
    /// store is still full the write is rejected.
    pub fn put(
        &mut self,
        key: String,
        value: Value,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                return Err(CacheError::Full(self.entries.len()));
            }
        }

        self.entries
            .insert(key, CacheEntry::new(value, ttl_seconds));
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed on the spot and counted as misses, so
    /// staleness is bounded by TTL alone; there is no invalidation API.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(100);

        store
            .put("player:#2PP".to_string(), json!({"name": "Ada"}), 300)
            .unwrap();
        let value = store.get("player:#2PP").unwrap();

        assert_eq!(value, json!({"name": "Ada"}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_replaces_entry() {
        let mut store = CacheStore::new(100);

        store.put("k".to_string(), json!(1), 300).unwrap();
        store.put("k".to_string(), json!(2), 300).unwrap();

        assert_eq!(store.get("k").unwrap(), json!(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100);

        store.put("k".to_string(), json!("v"), 1).unwrap();
        assert!(store.get("k").is_some());

        sleep(Duration::from_millis(1100));

        assert!(store.get("k").is_none());
        assert_eq!(store.len(), 0, "expired entry is removed on read");
    }

    #[test]
    fn test_store_full_after_sweep_rejects() {
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), json!(1), 300).unwrap();
        store.put("b".to_string(), json!(2), 300).unwrap();

        let result = store.put("c".to_string(), json!(3), 300);
        assert!(matches!(result, Err(CacheError::Full(_))));
        assert!(store.get("a").is_some());
        assert!(store.get("b").is_some());
    }

    #[test]
    fn test_store_full_reclaims_expired() {
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), json!(1), 1).unwrap();
        store.put("b".to_string(), json!(2), 300).unwrap();

        sleep(Duration::from_millis(1100));

        store.put("c".to_string(), json!(3), 300).unwrap();
        assert!(store.get("c").is_some());
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100);

        store.put("short".to_string(), json!(1), 1).unwrap();
        store.put("long".to_string(), json!(2), 300).unwrap();

        sleep(Duration::from_millis(1100));

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100);

        store.put("k".to_string(), json!("v"), 300).unwrap();
        store.get("k"); // hit
        store.get("missing"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
