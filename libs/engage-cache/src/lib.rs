//! Key-value cache layer for the discovery engine
//!
//! Provides a consistent caching strategy with:
//! - Unified key schema with versioning
//! - An object-safe cache trait so engines can swap Redis for an in-memory
//!   fake in tests
//! - SCAN-based pattern invalidation (no blocking KEYS)
//! - TTL jitter to avoid thundering herds
//! - Metrics integration

mod error;
mod metrics;

pub mod keys;
pub mod memory;

pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, CACHE_VERSION};
pub use memory::MemoryCache;
pub use metrics::CacheMetrics;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Pipeline};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared Redis connection manager
pub type SharedRedis = Arc<Mutex<ConnectionManager>>;

/// Default TTL values (seconds)
pub mod ttl {
    pub const FEATURED: u64 = 1800; // 30 minutes
    pub const RELATED: u64 = 3600; // 1 hour
    pub const POPULAR: u64 = 3600; // 1 hour
    pub const TRENDING: u64 = 7200; // 2 hours
}

/// Core cache operations trait
///
/// Values are serialized strings; callers own the encoding. The trait is
/// object safe so engines can hold `Arc<dyn KeyValueCache>`.
#[async_trait::async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get a value from cache
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value in cache with TTL
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()>;

    /// Delete a key from cache
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Batch delete every key matching a `prefix:*` pattern.
    /// Returns the number of keys removed. Best effort by contract:
    /// callers treat failures as soft.
    async fn delete_matching(&self, pattern: &str) -> CacheResult<usize>;
}

/// Redis-backed cache client
#[derive(Clone)]
pub struct RedisCache {
    redis: SharedRedis,
    metrics: CacheMetrics,
}

impl RedisCache {
    pub fn new(redis: SharedRedis) -> Self {
        Self {
            redis,
            metrics: CacheMetrics::new(),
        }
    }

    pub fn with_metrics(redis: SharedRedis, metrics: CacheMetrics) -> Self {
        Self { redis, metrics }
    }

    /// Add jitter to TTL to prevent thundering herd
    fn add_jitter(ttl_secs: u64) -> u64 {
        let jitter_percent = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter = (ttl_secs as f64 * jitter_percent).round() as u64;
        ttl_secs + jitter
    }
}

#[async_trait::async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.redis.lock().await;

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(key);
                Ok(Some(data))
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(key);
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_error(key, "redis");
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        let ttl_with_jitter = Self::add_jitter(ttl_secs);

        let mut conn = self.redis.lock().await;
        conn.set_ex::<_, _, ()>(key, value, ttl_with_jitter)
            .await
            .map_err(CacheError::Redis)?;

        debug!(key = %key, ttl = ttl_with_jitter, "Cache set");
        self.metrics.record_write(key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.lock().await;
        conn.del::<_, ()>(key).await.map_err(CacheError::Redis)?;

        debug!(key = %key, "Cache delete");
        self.metrics.record_invalidation(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<usize> {
        let mut conn = self.redis.lock().await;
        let mut cursor: u64 = 0;
        let mut total_deleted = 0;

        loop {
            // Use SCAN instead of KEYS to avoid blocking
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await
                .map_err(CacheError::Redis)?;

            if !keys.is_empty() {
                // Use pipeline for batch delete
                let mut pipe = Pipeline::new();
                for key in &keys {
                    pipe.del(key);
                }
                pipe.query_async::<_, ()>(&mut *conn)
                    .await
                    .map_err(CacheError::Redis)?;

                total_deleted += keys.len();
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %pattern, deleted = total_deleted, "Cache scan delete");
        self.metrics.record_invalidation(pattern);
        Ok(total_deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_jitter() {
        let ttl = 300u64;
        let with_jitter = RedisCache::add_jitter(ttl);
        // Jitter should be 0-10% of TTL
        assert!(with_jitter >= ttl);
        assert!(with_jitter <= ttl + (ttl / 10));
    }
}
