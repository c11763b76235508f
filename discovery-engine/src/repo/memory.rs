//! In-memory content repository
//!
//! Deterministic fake used by the integration tests and by embedders that
//! want an engine without a database. Counter increments happen under the
//! write lock, so concurrent callers never lose updates.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{Category, Comment, ContentItem, ShareRecord, SharePlatform, Tag};
use crate::repo::{ContentRepository, PublishedFilter};

#[derive(Default)]
struct Inner {
    items: HashMap<Uuid, ContentItem>,
    item_tags: HashMap<Uuid, Vec<Tag>>,
    item_categories: HashMap<Uuid, Vec<Category>>,
    comments: Vec<Comment>,
    shares: HashMap<(Uuid, SharePlatform), ShareRecord>,
    share_ids: HashMap<Uuid, (Uuid, SharePlatform)>,
}

#[derive(Default)]
pub struct InMemoryContentRepository {
    inner: RwLock<Inner>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item together with its tags and categories
    pub async fn insert_item(&self, item: ContentItem, tags: Vec<Tag>, categories: Vec<Category>) {
        let mut inner = self.inner.write().await;
        inner.item_tags.insert(item.id, tags);
        inner.item_categories.insert(item.id, categories);
        inner.items.insert(item.id, item);
    }

    /// Attach a comment to an item
    pub async fn insert_comment(&self, item_id: Uuid, is_approved: bool) {
        let mut inner = self.inner.write().await;
        inner.comments.push(Comment {
            id: Uuid::new_v4(),
            item_id,
            is_approved,
            created_at: Utc::now(),
        });
    }

    /// Current view count, for test assertions
    pub async fn view_count(&self, item_id: Uuid) -> Option<i64> {
        let inner = self.inner.read().await;
        inner.items.get(&item_id).map(|item| item.view_count)
    }

    /// Number of share records stored for an item, for test assertions
    pub async fn share_record_count(&self, item_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner
            .shares
            .keys()
            .filter(|(id, _)| *id == item_id)
            .count()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_published(&self, filter: &PublishedFilter) -> Result<Vec<ContentItem>> {
        let inner = self.inner.read().await;

        let mut items: Vec<ContentItem> = inner
            .items
            .values()
            .filter(|item| item.is_published())
            .filter(|item| !filter.featured_only || item.is_featured)
            .filter(|item| {
                filter
                    .created_after
                    .map_or(true, |cutoff| item.created_at >= cutoff)
            })
            .filter(|item| match &filter.tag_ids {
                Some(tag_ids) => inner
                    .item_tags
                    .get(&item.id)
                    .map_or(false, |tags| tags.iter().any(|t| tag_ids.contains(&t.id))),
                None => true,
            })
            .filter(|item| match &filter.category_ids {
                Some(category_ids) => inner.item_categories.get(&item.id).map_or(false, |cats| {
                    cats.iter().any(|c| category_ids.contains(&c.id))
                }),
                None => true,
            })
            .cloned()
            .collect();

        // Same ordering as the Postgres implementation
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<ContentItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items.get(&item_id).cloned())
    }

    async fn get_tags(&self, item_id: Uuid) -> Result<Vec<Tag>> {
        let inner = self.inner.read().await;
        Ok(inner.item_tags.get(&item_id).cloned().unwrap_or_default())
    }

    async fn get_categories(&self, item_id: Uuid) -> Result<Vec<Category>> {
        let inner = self.inner.read().await;
        Ok(inner
            .item_categories
            .get(&item_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn count_approved_comments(&self, item_id: Uuid) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .iter()
            .filter(|c| c.item_id == item_id && c.is_approved)
            .count() as i64)
    }

    async fn increment_view_count(&self, item_id: Uuid) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let item = inner
            .items
            .get_mut(&item_id)
            .ok_or_else(|| EngineError::NotFound(format!("content item {}", item_id)))?;
        item.view_count += 1;
        Ok(item.view_count)
    }

    async fn get_or_create_share_record(
        &self,
        item_id: Uuid,
        platform: SharePlatform,
    ) -> Result<ShareRecord> {
        let mut inner = self.inner.write().await;
        if !inner.items.contains_key(&item_id) {
            return Err(EngineError::NotFound(format!("content item {}", item_id)));
        }

        if let Some(record) = inner.shares.get(&(item_id, platform)) {
            return Ok(record.clone());
        }

        let record = ShareRecord {
            id: Uuid::new_v4(),
            item_id,
            platform,
            share_count: 0,
            last_shared_at: Utc::now(),
        };
        inner.share_ids.insert(record.id, (item_id, platform));
        inner.shares.insert((item_id, platform), record.clone());
        Ok(record)
    }

    async fn increment_share_count(&self, record_id: Uuid) -> Result<ShareRecord> {
        let mut inner = self.inner.write().await;
        let key = inner
            .share_ids
            .get(&record_id)
            .copied()
            .ok_or_else(|| EngineError::NotFound(format!("share record {}", record_id)))?;

        let record = inner
            .shares
            .get_mut(&key)
            .ok_or_else(|| EngineError::NotFound(format!("share record {}", record_id)))?;
        record.share_count += 1;
        record.last_shared_at = Utc::now();
        Ok(record.clone())
    }

    async fn get_share_records(&self, item_id: Uuid) -> Result<Vec<ShareRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<ShareRecord> = inner
            .shares
            .values()
            .filter(|record| record.item_id == item_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.platform);
        Ok(records)
    }
}
