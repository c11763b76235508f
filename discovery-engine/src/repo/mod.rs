//! Content repository abstraction
//!
//! The engine never owns content; it queries a repository and mutates
//! counters only through the repository's atomic increment operations.
//! The trait is object safe so engines can hold `Arc<dyn ContentRepository>`
//! and tests can inject the in-memory implementation.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryContentRepository;
pub use postgres::PostgresContentRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, ContentItem, ShareRecord, SharePlatform, Tag};

/// Filter for published-item queries
#[derive(Debug, Clone, Default)]
pub struct PublishedFilter {
    /// Only items flagged as featured
    pub featured_only: bool,
    /// Only items created at or after this instant
    pub created_after: Option<DateTime<Utc>>,
    /// Only items bearing at least one of these tags
    pub tag_ids: Option<Vec<Uuid>>,
    /// Only items in at least one of these categories
    pub category_ids: Option<Vec<Uuid>>,
}

impl PublishedFilter {
    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Self::default()
        }
    }

    pub fn created_after(cutoff: DateTime<Utc>) -> Self {
        Self {
            created_after: Some(cutoff),
            ..Self::default()
        }
    }
}

/// Query interface over content items, tags, categories, comments and
/// share records.
///
/// Counter mutations (`increment_view_count`, `increment_share_count`) are
/// atomic read-modify-writes at the storage layer; the engine never does a
/// read-then-write round trip on a counter.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Published items matching the filter. Draft items are never returned.
    async fn find_published(&self, filter: &PublishedFilter) -> Result<Vec<ContentItem>>;

    /// Single item by id, regardless of status
    async fn get_item(&self, item_id: Uuid) -> Result<Option<ContentItem>>;

    /// Tags attached to an item
    async fn get_tags(&self, item_id: Uuid) -> Result<Vec<Tag>>;

    /// Categories attached to an item
    async fn get_categories(&self, item_id: Uuid) -> Result<Vec<Category>>;

    /// Number of approved comments on an item
    async fn count_approved_comments(&self, item_id: Uuid) -> Result<i64>;

    /// Atomically add 1 to the item's view count and return the new value.
    /// Fails with NotFound when the item does not exist.
    async fn increment_view_count(&self, item_id: Uuid) -> Result<i64>;

    /// Fetch the (item, platform) share record, creating it with a zero
    /// count when absent. At most one record ever exists per pair.
    async fn get_or_create_share_record(
        &self,
        item_id: Uuid,
        platform: SharePlatform,
    ) -> Result<ShareRecord>;

    /// Atomically add 1 to a share record's count, stamp `last_shared_at`,
    /// and return the updated record.
    async fn increment_share_count(&self, record_id: Uuid) -> Result<ShareRecord>;

    /// All share records for an item (absent platforms simply have no row)
    async fn get_share_records(&self, item_id: Uuid) -> Result<Vec<ShareRecord>>;
}
