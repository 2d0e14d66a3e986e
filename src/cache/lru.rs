//! Bounded LRU cache
//!
//! Thin synchronous wrapper over `lru::LruCache` that adds capacity
//! validation, eviction logging, and stats snapshots. Both reads and
//! writes promote the touched key to most-recently-used, so eviction on
//! overflow always removes the least-recently-*accessed* entry, not the
//! least-recently-inserted one.

use std::hash::Hash;
use std::num::NonZeroUsize;

use thiserror::Error;
use tracing::debug;

use super::stats::CacheStats;

/// Rejected cache construction with a zero capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cache capacity must be greater than zero")]
pub struct InvalidCapacity;

/// Capacity-bounded key/value cache with LRU eviction
pub struct BoundedLruCache<K: Hash + Eq, V> {
    inner: lru::LruCache<K, V>,
}

impl<K: Hash + Eq, V> BoundedLruCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        let capacity = NonZeroUsize::new(capacity).ok_or(InvalidCapacity)?;
        Ok(Self {
            inner: lru::LruCache::new(capacity),
        })
    }

    /// Look up a key, promoting it to most-recently-used on hit
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    /// Insert or replace a value, promoting the key to most-recently-used
    ///
    /// When the cache is full and `key` is new, the least-recently-used
    /// entry is evicted first.
    pub fn put(&mut self, key: K, value: V) {
        // push also returns the displaced value on same-key replacement, so
        // detect genuine evictions before inserting
        let evicts = self.inner.len() == self.inner.cap().get() && !self.inner.contains(&key);
        self.inner.push(key, value);
        if evicts {
            debug!(
                capacity = self.inner.cap().get(),
                "evicted least-recently-used cache entry"
            );
        }
    }

    /// Whether a key is present, without promoting it
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    /// Drop every entry
    ///
    /// Used by tests and hot-reload paths; steady-state runtime logic
    /// relies on LRU eviction instead.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Point-in-time usage snapshot
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.inner.len(), self.inner.cap().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert!(BoundedLruCache::<String, u32>::new(0).is_err());
        assert!(BoundedLruCache::<String, u32>::new(1).is_ok());
    }

    #[test]
    fn test_get_returns_inserted_value() {
        let mut cache = BoundedLruCache::new(4).unwrap();
        cache.put("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(&1));
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_put_replaces_existing_value() {
        let mut cache = BoundedLruCache::new(4).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("a".to_string(), 2);
        assert_eq!(cache.get(&"a".to_string()), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overflow_evicts_least_recently_used() {
        let mut cache = BoundedLruCache::new(2).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        assert!(!cache.contains(&"a".to_string()));
        assert!(cache.contains(&"b".to_string()));
        assert!(cache.contains(&"c".to_string()));
    }

    #[test]
    fn test_get_promotes_against_eviction() {
        let mut cache = BoundedLruCache::new(2).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        // Touch "a" so "b" becomes the eviction candidate
        cache.get(&"a".to_string());
        cache.put("c".to_string(), 3);

        assert!(cache.contains(&"a".to_string()));
        assert!(!cache.contains(&"b".to_string()));
        assert!(cache.contains(&"c".to_string()));
    }

    #[test]
    fn test_put_promotes_existing_key() {
        let mut cache = BoundedLruCache::new(2).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        // Re-inserting "a" promotes it; "b" is now least-recently-used
        cache.put("a".to_string(), 10);
        cache.put("c".to_string(), 3);

        assert!(cache.contains(&"a".to_string()));
        assert!(!cache.contains(&"b".to_string()));
    }

    #[test]
    fn test_clear_resets_cache() {
        let mut cache = BoundedLruCache::new(4).unwrap();
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_stats_snapshot() {
        let mut cache = BoundedLruCache::new(10).unwrap();
        for i in 0..5 {
            cache.put(format!("key-{}", i), i);
        }
        let stats = cache.stats();
        assert_eq!(stats.size, 5);
        assert_eq!(stats.max_size, 10);
        assert!((stats.usage_percent - 50.0).abs() < f64::EPSILON);
    }
}
