//! Engine instance caching
//!
//! Engines are cheap to use but carry validated configuration and a
//! builder factory, so construction is worth memoizing. Entries live
//! under a sliding TTL: every hit refreshes the last-access time, and an
//! entry that has gone unaccessed past the TTL is rebuilt on next use.
//! When the cache is full, entries are evicted in ascending last-access
//! order until there is room.
//!
//! Time is `std::time::Instant` — monotonic, so wall-clock adjustments
//! can never expire entries early or keep them alive late. The public
//! API reads the clock itself; the `*_at` methods take an explicit
//! instant so tests drive expiry deterministically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, InvalidCapacity};
use crate::config::{ConfigError, SnapkitConfig};
use crate::constants::{DEFAULT_ENGINE_CACHE_CAPACITY, DEFAULT_ENGINE_CACHE_TTL_SECS};
use crate::url::UrlBuilderFactory;

use super::ImageEngine;

struct EngineEntry {
    engine: Arc<ImageEngine>,
    last_access: Instant,
}

/// Bounded, sliding-TTL cache of [`ImageEngine`] instances
///
/// Keyed by the canonical configuration serialization, so structurally
/// equal configs always resolve to the same engine while any field
/// difference produces a distinct one. All cached engines share one
/// [`UrlBuilderFactory`].
pub struct EngineCache {
    entries: Mutex<HashMap<String, EngineEntry>>,
    capacity: usize,
    ttl: Duration,
    factory: Arc<UrlBuilderFactory>,
}

impl EngineCache {
    /// Create a cache with default capacity (10) and TTL (5 minutes)
    pub fn new() -> Self {
        // SAFETY: the default capacity constant is non-zero
        Self::with_settings(
            DEFAULT_ENGINE_CACHE_CAPACITY,
            Duration::from_secs(DEFAULT_ENGINE_CACHE_TTL_SECS),
        )
        .expect("default engine cache capacity is non-zero")
    }

    /// Create a cache with explicit capacity and TTL
    pub fn with_settings(capacity: usize, ttl: Duration) -> Result<Self, InvalidCapacity> {
        if capacity == 0 {
            return Err(InvalidCapacity);
        }
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            ttl,
            factory: Arc::new(UrlBuilderFactory::new()),
        })
    }

    /// The builder factory shared by every cached engine
    pub fn factory(&self) -> &Arc<UrlBuilderFactory> {
        &self.factory
    }

    /// Return the cached engine for this configuration, building on miss
    ///
    /// A live entry is returned as-is with its last-access time refreshed;
    /// an expired entry is rebuilt and replaced.
    pub fn get_or_create(&self, config: &SnapkitConfig) -> Result<Arc<ImageEngine>, ConfigError> {
        self.get_or_create_at(config, Instant::now())
    }

    /// Clock-explicit variant of [`EngineCache::get_or_create`]
    pub fn get_or_create_at(
        &self,
        config: &SnapkitConfig,
        now: Instant,
    ) -> Result<Arc<ImageEngine>, ConfigError> {
        let key = config.cache_key();
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(&key) {
            if now.duration_since(entry.last_access) < self.ttl {
                entry.last_access = now;
                debug!(key = %key, "engine cache hit");
                return Ok(Arc::clone(&entry.engine));
            }
            debug!(key = %key, "engine cache entry expired");
            entries.remove(&key);
        }

        let engine = Arc::new(ImageEngine::new(config.clone(), Arc::clone(&self.factory))?);

        // Make room before inserting, oldest access first
        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest_key) => {
                    debug!(key = %oldest_key, "evicted engine cache entry");
                    entries.remove(&oldest_key);
                }
                None => break,
            }
        }

        entries.insert(
            key,
            EngineEntry {
                engine: Arc::clone(&engine),
                last_access: now,
            },
        );
        Ok(engine)
    }

    /// Number of cached engines (expired entries included until touched)
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no engines are cached
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached engine
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Point-in-time cache usage snapshot
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.entries.lock().len(), self.capacity)
    }
}

impl Default for EngineCache {
    fn default() -> Self {
        Self::new()
    }
}
