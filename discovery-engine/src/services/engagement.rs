//! Engagement counters
//!
//! View and share counters backed by the repository's atomic increments.
//! Platform validation happens here, before any storage call, so an
//! unrecognized platform never creates a record.

use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{ShareCounts, ShareRecord, SharePlatform};
use crate::repo::ContentRepository;

/// Increment an item's view count by exactly 1, returning the new count.
pub async fn record_view(repo: &dyn ContentRepository, item_id: Uuid) -> Result<i64> {
    let new_count = repo.increment_view_count(item_id).await?;
    debug!(item = %item_id, views = new_count, "Recorded view");
    Ok(new_count)
}

/// Record one share of an item on a platform. The platform string is
/// validated against the closed platform set; get-or-create plus an atomic
/// increment keeps exactly one record per (item, platform) pair.
pub async fn record_share(
    repo: &dyn ContentRepository,
    item_id: Uuid,
    platform: &str,
) -> Result<ShareRecord> {
    let platform: SharePlatform = platform.parse()?;

    let item = repo
        .get_item(item_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("content item {}", item_id)))?;

    let record = repo.get_or_create_share_record(item.id, platform).await?;
    let updated = repo.increment_share_count(record.id).await?;
    debug!(
        item = %item_id,
        platform = %platform,
        shares = updated.share_count,
        "Recorded share"
    );
    Ok(updated)
}

/// Per-platform share counts for an item; every enumerated platform is
/// present, defaulting to 0.
pub async fn share_counts(repo: &dyn ContentRepository, item_id: Uuid) -> Result<ShareCounts> {
    let records = repo.get_share_records(item_id).await?;
    Ok(ShareCounts::from_records(&records))
}

/// Total shares across all platforms for an item
pub async fn total_shares(repo: &dyn ContentRepository, item_id: Uuid) -> Result<i64> {
    let records = repo.get_share_records(item_id).await?;
    Ok(records.iter().map(|record| record.share_count).sum())
}
