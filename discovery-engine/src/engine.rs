//! Discovery engine facade
//!
//! Wires the scorers and counters to an injected content repository and
//! key-value cache. Every read goes through the cache-aside path; every
//! engagement write triggers best-effort invalidation of the dependent
//! cache families. Caching is purely a latency optimization: results are
//! identical with a cold, warm or absent cache.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use engage_cache::{CacheKey, KeyValueCache};

use crate::config::DiscoveryConfig;
use crate::error::{EngineError, Result};
use crate::metrics::{
    DISCOVERY_REQUEST_TOTAL, ENGAGEMENT_WRITE_TOTAL, INVALIDATION_FAILURE_TOTAL,
};
use crate::models::{
    ContentItem, PopularItem, ScoredItem, ShareCounts, ShareRecord, Timeframe, TrendingTag,
};
use crate::repo::{ContentRepository, PublishedFilter};
use crate::services::relevance::{rank_related, ItemSignals, RelevanceWeights};
use crate::services::{engagement, popularity, trending};

pub struct DiscoveryEngine {
    repo: Arc<dyn ContentRepository>,
    cache: Arc<dyn KeyValueCache>,
    config: DiscoveryConfig,
    weights: RelevanceWeights,
}

impl DiscoveryEngine {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        cache: Arc<dyn KeyValueCache>,
        config: DiscoveryConfig,
    ) -> Self {
        let weights = RelevanceWeights::from(&config);
        Self {
            repo,
            cache,
            config,
            weights,
        }
    }

    // ============= Read operations =============

    /// Featured published items, newest first
    pub async fn get_featured(&self, limit: usize) -> Result<Vec<ContentItem>> {
        validate_limit(limit)?;
        let key = CacheKey::featured(limit);
        self.cached("featured", &key, self.config.featured_ttl_secs, move || async move {
            self.compute_featured(limit).await
        })
        .await
    }

    /// Items most relevant to `item_id`, relevance-scored and ordered.
    /// Only candidates scoring above zero are returned; an empty list is a
    /// valid outcome.
    pub async fn get_related(&self, item_id: Uuid, limit: usize) -> Result<Vec<ScoredItem>> {
        validate_limit(limit)?;
        let key = CacheKey::related(item_id, limit);
        self.cached("related", &key, self.config.related_ttl_secs, move || async move {
            self.compute_related(item_id, limit, Utc::now()).await
        })
        .await
    }

    /// Most engaging published items within the timeframe
    pub async fn get_popular(
        &self,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<PopularItem>> {
        validate_limit(limit)?;
        let key = CacheKey::popular(timeframe.as_str(), limit);
        self.cached("popular", &key, self.config.popular_ttl_secs, move || async move {
            self.compute_popular(timeframe, limit, Utc::now()).await
        })
        .await
    }

    /// Tags trending over the recent window
    pub async fn get_trending_tags(&self, limit: usize) -> Result<Vec<TrendingTag>> {
        validate_limit(limit)?;
        let key = CacheKey::trending(limit);
        self.cached("trending", &key, self.config.trending_ttl_secs, move || async move {
            self.compute_trending(limit, Utc::now()).await
        })
        .await
    }

    /// Per-platform share counts for an item (complete map, absent -> 0)
    pub async fn get_share_counts(&self, item_id: Uuid) -> Result<ShareCounts> {
        engagement::share_counts(self.repo.as_ref(), item_id).await
    }

    /// Sum of shares across all platforms for an item
    pub async fn get_total_shares(&self, item_id: Uuid) -> Result<i64> {
        engagement::total_shares(self.repo.as_ref(), item_id).await
    }

    // ============= Write operations =============

    /// Record one view. The increment is atomic at the repository level;
    /// dependent cache families are invalidated best-effort afterwards.
    pub async fn record_view(&self, item_id: Uuid) -> Result<i64> {
        let new_count = engagement::record_view(self.repo.as_ref(), item_id).await?;
        ENGAGEMENT_WRITE_TOTAL.with_label_values(&["view"]).inc();

        self.invalidate(&[CacheKey::popular_pattern(), CacheKey::trending_pattern()])
            .await;
        Ok(new_count)
    }

    /// Record one share on a platform. Validation failures surface before
    /// any storage mutation; invalidation covers the popularity and
    /// trending families plus this item's related results.
    pub async fn record_share(&self, item_id: Uuid, platform: &str) -> Result<ShareRecord> {
        let record = engagement::record_share(self.repo.as_ref(), item_id, platform).await?;
        ENGAGEMENT_WRITE_TOTAL.with_label_values(&["share"]).inc();

        self.invalidate(&[
            CacheKey::popular_pattern(),
            CacheKey::trending_pattern(),
            CacheKey::related_item_pattern(item_id),
        ])
        .await;
        Ok(record)
    }

    // ============= Computation (cache-independent) =============

    async fn compute_featured(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let mut items = self.repo.find_published(&PublishedFilter::featured()).await?;
        items.truncate(limit);
        Ok(items)
    }

    async fn compute_related(
        &self,
        item_id: Uuid,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredItem>> {
        let origin = self
            .repo
            .get_item(item_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("content item {}", item_id)))?;
        let origin = self.load_signals(origin).await?;

        let published = self.repo.find_published(&PublishedFilter::default()).await?;
        let mut candidates = Vec::with_capacity(published.len());
        for item in published {
            if item.id == item_id {
                continue;
            }
            candidates.push(self.load_signals(item).await?);
        }

        Ok(rank_related(&origin, &candidates, limit, now, &self.weights))
    }

    async fn compute_popular(
        &self,
        timeframe: Timeframe,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<PopularItem>> {
        let filter = match timeframe.cutoff(now) {
            Some(cutoff) => PublishedFilter::created_after(cutoff),
            None => PublishedFilter::default(),
        };
        let items = self.repo.find_published(&filter).await?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let approved_comments = self.repo.count_approved_comments(item.id).await?;
            let total_shares = engagement::total_shares(self.repo.as_ref(), item.id).await?;
            entries.push((item, approved_comments, total_shares));
        }

        Ok(popularity::rank_popular(entries, limit))
    }

    async fn compute_trending(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<TrendingTag>> {
        let cutoff = now - Duration::days(self.config.recency_window_days);
        let items = self
            .repo
            .find_published(&PublishedFilter::created_after(cutoff))
            .await?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let tags = self.repo.get_tags(item.id).await?;
            entries.push((item, tags));
        }

        Ok(trending::rank_trending(&entries, limit))
    }

    async fn load_signals(&self, item: ContentItem) -> Result<ItemSignals> {
        let tag_ids: HashSet<Uuid> = self
            .repo
            .get_tags(item.id)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        let category_ids: HashSet<Uuid> = self
            .repo
            .get_categories(item.id)
            .await?
            .into_iter()
            .map(|category| category.id)
            .collect();
        Ok(ItemSignals::new(item, tag_ids, category_ids))
    }

    // ============= Cache-aside plumbing =============

    /// Get-or-compute-and-store. Cache failures on either side degrade to
    /// direct computation; they never fail the read.
    async fn cached<T, F, Fut>(
        &self,
        operation: &'static str,
        key: &str,
        ttl_secs: u64,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    DISCOVERY_REQUEST_TOTAL
                        .with_label_values(&[operation, "cache"])
                        .inc();
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Corrupted cache entry, recomputing");
                    let _ = self.cache.delete(key).await;
                }
            },
            Ok(None) => {}
            Err(e) => {
                // Cache backend down: treat as a miss and serve from the repository
                warn!(key = %key, error = %e, "Cache unavailable, computing directly");
            }
        }

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(key, &raw, ttl_secs).await {
                    warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Cache serialization failed"),
        }

        DISCOVERY_REQUEST_TOTAL
            .with_label_values(&[operation, "computed"])
            .inc();
        Ok(value)
    }

    /// Best-effort bulk invalidation. Failures are logged and swallowed;
    /// stale entries self-correct at TTL expiry.
    async fn invalidate(&self, patterns: &[String]) {
        for pattern in patterns {
            match self.cache.delete_matching(pattern).await {
                Ok(deleted) => {
                    debug!(pattern = %pattern, deleted, "Invalidated cache family")
                }
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "Cache invalidation failed, entries expire at TTL");
                    let family = CacheKey::family(pattern).unwrap_or("unknown");
                    INVALIDATION_FAILURE_TOTAL
                        .with_label_values(&[family])
                        .inc();
                }
            }
        }
    }
}

fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(EngineError::Validation(
            "limit must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1).is_ok());
    }
}
