//! Cache statistics types

use serde::Serialize;

/// Point-in-time cache usage snapshot for monitoring
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of cached entries
    pub size: usize,
    /// Maximum number of entries the cache will hold
    pub max_size: usize,
    /// Occupancy as a percentage of capacity
    pub usage_percent: f64,
}

impl CacheStats {
    /// Build a snapshot from current and maximum entry counts
    pub fn new(size: usize, max_size: usize) -> Self {
        let usage_percent = if max_size == 0 {
            0.0
        } else {
            (size as f64 / max_size as f64) * 100.0
        };
        Self {
            size,
            max_size,
            usage_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_usage_percent() {
        let stats = CacheStats::new(5, 50);
        assert_eq!(stats.size, 5);
        assert_eq!(stats.max_size, 50);
        assert!((stats.usage_percent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty_cache() {
        let stats = CacheStats::new(0, 10);
        assert_eq!(stats.usage_percent, 0.0);
    }

    #[test]
    fn test_stats_full_cache() {
        let stats = CacheStats::new(10, 10);
        assert!((stats.usage_percent - 100.0).abs() < f64::EPSILON);
    }
}
