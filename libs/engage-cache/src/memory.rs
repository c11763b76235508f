//! In-memory cache implementation
//!
//! Deterministic stand-in for [`RedisCache`](crate::RedisCache) used in tests
//! and local development. Entries expire lazily on read.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::error::CacheResult;
use crate::KeyValueCache;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local key-value cache with TTL semantics
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.value().expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Glob match supporting `*` wildcards, enough for the key patterns
    /// issued by [`CacheKey`](crate::CacheKey).
    fn matches(pattern: &str, key: &str) -> bool {
        if !pattern.contains('*') {
            return pattern == key;
        }

        let segments: Vec<&str> = pattern.split('*').collect();
        let first = segments[0];
        let last = segments[segments.len() - 1];
        if !key.starts_with(first)
            || !key.ends_with(last)
            || key.len() < first.len() + last.len()
        {
            return false;
        }

        // Middle segments must appear in order between the anchors
        let mut rest = &key[first.len()..key.len() - last.len()];
        for segment in &segments[1..segments.len() - 1] {
            if segment.is_empty() {
                continue;
            }
            match rest.find(segment) {
                Some(idx) => rest = &rest[idx + segment.len()..],
                None => return false,
            }
        }
        true
    }
}

#[async_trait::async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Expired entries are dropped on the next read
        self.entries
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<usize> {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| Self::matches(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut deleted = 0;
        for key in keys {
            if self.entries.remove(&key).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheKey;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        cache.set("k1", "v1", 60).await.unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), Some("v1".to_string()));

        cache.delete("k1").await.unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new();
        cache.set("k1", "v1", 0).await.unwrap();
        assert_eq!(cache.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_matching_removes_family() {
        let cache = MemoryCache::new();
        cache
            .set(&CacheKey::popular("week", 10), "a", 60)
            .await
            .unwrap();
        cache
            .set(&CacheKey::popular("month", 5), "b", 60)
            .await
            .unwrap();
        cache.set(&CacheKey::trending(10), "c", 60).await.unwrap();

        let deleted = cache
            .delete_matching(&CacheKey::popular_pattern())
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(cache.get(&CacheKey::trending(10)).await.unwrap(), Some("c".into()));
    }

    #[tokio::test]
    async fn test_delete_matching_scopes_to_item() {
        let cache = MemoryCache::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        cache.set(&CacheKey::related(a, 5), "a", 60).await.unwrap();
        cache.set(&CacheKey::related(b, 5), "b", 60).await.unwrap();

        let deleted = cache
            .delete_matching(&CacheKey::related_item_pattern(a))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(cache.get(&CacheKey::related(b, 5)).await.unwrap().is_some());
    }

    #[test]
    fn test_glob_matching() {
        assert!(MemoryCache::matches("v1:discovery:popular:*", "v1:discovery:popular:week:10"));
        assert!(!MemoryCache::matches("v1:discovery:popular:*", "v1:discovery:trending:10"));
        assert!(MemoryCache::matches("v1:*:10", "v1:discovery:trending:10"));
        assert!(!MemoryCache::matches("v1:*:10", "v1:discovery:trending:11"));
    }
}
