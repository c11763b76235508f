//! Composite popularity ranking
//!
//! Score per item: `view_count + 2 x approved comments + 3 x total shares`,
//! computed over a timeframe-bounded set of published items. Ordering is
//! score descending with newest-first as the tie-break.

use std::cmp::Reverse;

use crate::models::{ContentItem, PopularItem};

pub const COMMENT_WEIGHT: i64 = 2;
pub const SHARE_WEIGHT: i64 = 3;

/// Composite engagement score
pub fn engagement_score(view_count: i64, approved_comments: i64, total_shares: i64) -> i64 {
    view_count + COMMENT_WEIGHT * approved_comments + SHARE_WEIGHT * total_shares
}

/// Rank items already bounded to the requested timeframe.
/// Each entry carries (item, approved comment count, total share count).
pub fn rank_popular(entries: Vec<(ContentItem, i64, i64)>, limit: usize) -> Vec<PopularItem> {
    let mut ranked: Vec<PopularItem> = entries
        .into_iter()
        .map(|(item, approved_comments, total_shares)| {
            let score = engagement_score(item.view_count, approved_comments, total_shares);
            PopularItem {
                item,
                approved_comments,
                total_shares,
                engagement_score: score,
            }
        })
        .collect();

    ranked.sort_by_key(|entry| {
        (
            Reverse(entry.engagement_score),
            Reverse(entry.item.created_at),
        )
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentStatus;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn item(view_count: i64, age_days: i64) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            title: "item".to_string(),
            body: String::new(),
            excerpt: None,
            status: ContentStatus::Published,
            is_featured: false,
            view_count,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_engagement_score_weights() {
        // 10 views + 2x3 comments + 3x2 shares
        assert_eq!(engagement_score(10, 3, 2), 22);
        assert_eq!(engagement_score(0, 0, 0), 0);
    }

    #[test]
    fn test_ordering_by_score_desc() {
        let low = item(5, 1);
        let high = item(50, 1);

        let ranked = rank_popular(vec![(low, 0, 0), (high.clone(), 0, 0)], 10);
        assert_eq!(ranked[0].item.id, high.id);
        assert_eq!(ranked[0].engagement_score, 50);
    }

    #[test]
    fn test_tie_break_newest_first() {
        let older = item(10, 5);
        let newer = item(10, 1);

        let ranked = rank_popular(vec![(older.clone(), 0, 0), (newer.clone(), 0, 0)], 10);
        assert_eq!(ranked[0].item.id, newer.id);
        assert_eq!(ranked[1].item.id, older.id);
    }

    #[test]
    fn test_comments_and_shares_outweigh_views() {
        let viewed = item(10, 1);
        let shared = item(0, 1);

        // 4 shares at weight 3 beats 10 views
        let ranked = rank_popular(vec![(viewed.clone(), 0, 0), (shared.clone(), 0, 4)], 10);
        assert_eq!(ranked[0].item.id, shared.id);
        assert_eq!(ranked[0].engagement_score, 12);
    }

    #[test]
    fn test_limit_truncates() {
        let entries = (0..5).map(|i| (item(i, 1), 0, 0)).collect();
        let ranked = rank_popular(entries, 3);
        assert_eq!(ranked.len(), 3);
    }
}
