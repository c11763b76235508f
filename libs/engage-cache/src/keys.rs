//! Unified cache key schema
//!
//! All cached discovery results are keyed through these generators so that
//! invalidation patterns and read keys can never drift apart.
//! Key format: v{VERSION}:discovery:{family}:{params}

use uuid::Uuid;

/// Cache schema version - increment when changing key formats
pub const CACHE_VERSION: u32 = 1;

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Featured items list
    /// Format: v1:discovery:featured:{limit}
    pub fn featured(limit: usize) -> String {
        format!("v{}:discovery:featured:{}", CACHE_VERSION, limit)
    }

    /// Related items for one origin item
    /// Format: v1:discovery:related:{item_id}:{limit}
    pub fn related(item_id: Uuid, limit: usize) -> String {
        format!("v{}:discovery:related:{}:{}", CACHE_VERSION, item_id, limit)
    }

    /// Popular items for a timeframe
    /// Format: v1:discovery:popular:{timeframe}:{limit}
    pub fn popular(timeframe: &str, limit: usize) -> String {
        format!(
            "v{}:discovery:popular:{}:{}",
            CACHE_VERSION, timeframe, limit
        )
    }

    /// Trending tags list
    /// Format: v1:discovery:trending:{limit}
    pub fn trending(limit: usize) -> String {
        format!("v{}:discovery:trending:{}", CACHE_VERSION, limit)
    }

    // ============= Invalidation patterns =============

    /// Pattern matching every featured key regardless of limit
    pub fn featured_pattern() -> String {
        format!("v{}:discovery:featured:*", CACHE_VERSION)
    }

    /// Pattern matching every popular key regardless of timeframe/limit
    pub fn popular_pattern() -> String {
        format!("v{}:discovery:popular:*", CACHE_VERSION)
    }

    /// Pattern matching every trending key regardless of limit
    pub fn trending_pattern() -> String {
        format!("v{}:discovery:trending:*", CACHE_VERSION)
    }

    /// Pattern matching every related key for one origin item
    pub fn related_item_pattern(item_id: Uuid) -> String {
        format!("v{}:discovery:related:{}:*", CACHE_VERSION, item_id)
    }

    /// Extract the key family from a full key
    pub fn family(key: &str) -> Option<&str> {
        // Format: v{N}:discovery:{family}:...
        let parts: Vec<&str> = key.split(':').collect();
        if parts.len() >= 3 {
            Some(parts[2])
        } else {
            None
        }
    }
}
