//! URL builder instance caching

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{BoundedLruCache, CacheStats};
use crate::config::{CdnProvider, ConfigError};
use crate::constants::DEFAULT_BUILDER_CACHE_CAPACITY;

use super::builder::UrlBuilder;

/// Memoizes one [`UrlBuilder`] per distinct CDN configuration
///
/// Keys are derived from the provider (`hosted:<org>` / `custom:<base>`),
/// so identical configurations share a builder while configurations that
/// differ in any field never do. The cache is bounded LRU; the factory is
/// an explicit, injectable object owned by whatever composition root
/// constructs engines, not a process-wide static.
pub struct UrlBuilderFactory {
    cache: Mutex<BoundedLruCache<String, Arc<UrlBuilder>>>,
}

impl UrlBuilderFactory {
    /// Create a factory with the default capacity (50 builders)
    pub fn new() -> Self {
        // SAFETY: the default capacity constant is non-zero
        Self::with_capacity(DEFAULT_BUILDER_CACHE_CAPACITY)
            .expect("default builder cache capacity is non-zero")
    }

    /// Create a factory with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Result<Self, crate::cache::InvalidCapacity> {
        Ok(Self {
            cache: Mutex::new(BoundedLruCache::new(capacity)?),
        })
    }

    /// Return the cached builder for this provider, constructing it on miss
    pub fn get_or_create(&self, provider: &CdnProvider) -> Result<Arc<UrlBuilder>, ConfigError> {
        let key = provider.cache_key();
        let mut cache = self.cache.lock();

        if let Some(builder) = cache.get(&key) {
            debug!(key = %key, "url builder cache hit");
            return Ok(Arc::clone(builder));
        }

        debug!(key = %key, "url builder cache miss");
        let builder = Arc::new(UrlBuilder::new(provider)?);
        cache.put(key, Arc::clone(&builder));
        Ok(builder)
    }

    /// Number of cached builders
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether no builders are cached
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Drop every cached builder
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Point-in-time cache usage snapshot
    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }
}

impl Default for UrlBuilderFactory {
    fn default() -> Self {
        Self::new()
    }
}
