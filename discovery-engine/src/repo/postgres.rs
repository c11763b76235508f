//! Postgres-backed content repository
//!
//! Counter mutations are single-statement atomic updates
//! (`SET x = x + 1 ... RETURNING`); the (item, platform) share uniqueness is
//! a database constraint, enforced through `INSERT ... ON CONFLICT`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{Category, ContentItem, ShareRecord, SharePlatform, Tag};
use crate::repo::{ContentRepository, PublishedFilter};

#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn find_published(&self, filter: &PublishedFilter) -> Result<Vec<ContentItem>> {
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT id, title, body, excerpt, status, is_featured, view_count, created_at
            FROM content_items
            WHERE status = 'published'
              AND ($1::bool IS FALSE OR is_featured)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::uuid[] IS NULL
                   OR id IN (SELECT item_id FROM item_tags WHERE tag_id = ANY($3)))
              AND ($4::uuid[] IS NULL
                   OR id IN (SELECT item_id FROM item_categories WHERE category_id = ANY($4)))
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(filter.featured_only)
        .bind(filter.created_after)
        .bind(filter.tag_ids.as_deref())
        .bind(filter.category_ids.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<ContentItem>> {
        let item = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT id, title, body, excerpt, status, is_featured, view_count, created_at
            FROM content_items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn get_tags(&self, item_id: Uuid) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN item_tags it ON it.tag_id = t.id
            WHERE it.item_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn get_categories(&self, item_id: Uuid) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN item_categories ic ON ic.category_id = c.id
            WHERE ic.item_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn count_approved_comments(&self, item_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE item_id = $1 AND is_approved",
        )
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn increment_view_count(&self, item_id: Uuid) -> Result<i64> {
        let new_count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE content_items
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING view_count
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        new_count.ok_or_else(|| EngineError::NotFound(format!("content item {}", item_id)))
    }

    async fn get_or_create_share_record(
        &self,
        item_id: Uuid,
        platform: SharePlatform,
    ) -> Result<ShareRecord> {
        // The no-op DO UPDATE makes RETURNING yield the row on both paths
        let record = sqlx::query_as::<_, ShareRecord>(
            r#"
            INSERT INTO share_records (item_id, platform)
            VALUES ($1, $2)
            ON CONFLICT (item_id, platform) DO UPDATE SET item_id = EXCLUDED.item_id
            RETURNING id, item_id, platform, share_count, last_shared_at
            "#,
        )
        .bind(item_id)
        .bind(platform.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn increment_share_count(&self, record_id: Uuid) -> Result<ShareRecord> {
        let record = sqlx::query_as::<_, ShareRecord>(
            r#"
            UPDATE share_records
            SET share_count = share_count + 1, last_shared_at = NOW()
            WHERE id = $1
            RETURNING id, item_id, platform, share_count, last_shared_at
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| EngineError::NotFound(format!("share record {}", record_id)))
    }

    async fn get_share_records(&self, item_id: Uuid) -> Result<Vec<ShareRecord>> {
        let records = sqlx::query_as::<_, ShareRecord>(
            r#"
            SELECT id, item_id, platform, share_count, last_shared_at
            FROM share_records
            WHERE item_id = $1
            ORDER BY platform
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
