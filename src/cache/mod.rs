//! Bounded in-memory caching
//!
//! This module provides the synchronous cache primitives used by the URL
//! builder factory and the engine cache:
//! - `BoundedLruCache`: capacity-bounded LRU with touch-on-read promotion
//! - `CacheStats`: point-in-time usage snapshot
//!
//! The caches here are plain value types with `&mut self` methods and no
//! interior locking; owners that share them across threads wrap them in a
//! mutex (see `UrlBuilderFactory` and `EngineCache`).

mod lru;
mod stats;

pub use self::lru::{BoundedLruCache, InvalidCapacity};
pub use self::stats::CacheStats;
