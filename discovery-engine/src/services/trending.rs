//! Trending tag ranking
//!
//! Tags are scored over published items from the recent window:
//! `engagement = 2 x recent post count + views across those posts`.
//! Tags with no recent posts never appear. Ordering is score descending
//! with tag name ascending as the tie-break.

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{ContentItem, Tag, TrendingTag};

pub const RECENT_POST_WEIGHT: i64 = 2;

/// Aggregate and rank tags from recent items and their tag sets.
/// Callers bound `entries` to the recency window before calling.
pub fn rank_trending(entries: &[(ContentItem, Vec<Tag>)], limit: usize) -> Vec<TrendingTag> {
    let mut per_tag: HashMap<Uuid, TrendingTag> = HashMap::new();

    for (item, tags) in entries {
        for tag in tags {
            let entry = per_tag.entry(tag.id).or_insert_with(|| TrendingTag {
                tag: tag.clone(),
                recent_post_count: 0,
                total_views: 0,
                engagement_score: 0,
            });
            entry.recent_post_count += 1;
            entry.total_views += item.view_count;
        }
    }

    let mut ranked: Vec<TrendingTag> = per_tag
        .into_values()
        .map(|mut entry| {
            entry.engagement_score =
                RECENT_POST_WEIGHT * entry.recent_post_count + entry.total_views;
            entry
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.engagement_score
            .cmp(&a.engagement_score)
            .then_with(|| a.tag.name.cmp(&b.tag.name))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentStatus;
    use chrono::Utc;

    fn item(view_count: i64) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            title: "item".to_string(),
            body: String::new(),
            excerpt: None,
            status: ContentStatus::Published,
            is_featured: false,
            view_count,
            created_at: Utc::now(),
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_aggregates_posts_and_views_per_tag() {
        let rust = tag("rust");
        let entries = vec![
            (item(10), vec![rust.clone()]),
            (item(5), vec![rust.clone()]),
        ];

        let ranked = rank_trending(&entries, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].recent_post_count, 2);
        assert_eq!(ranked[0].total_views, 15);
        // 2x2 posts + 15 views
        assert_eq!(ranked[0].engagement_score, 19);
    }

    #[test]
    fn test_ordering_by_score_then_name() {
        let alpha = tag("alpha");
        let beta = tag("beta");
        let hot = tag("hot");

        let entries = vec![
            (item(100), vec![hot.clone()]),
            (item(3), vec![alpha.clone()]),
            (item(3), vec![beta.clone()]),
        ];

        let ranked = rank_trending(&entries, 10);
        assert_eq!(ranked[0].tag.name, "hot");
        // alpha and beta tie at 2 + 3; lexicographic name breaks it
        assert_eq!(ranked[1].tag.name, "alpha");
        assert_eq!(ranked[2].tag.name, "beta");
    }

    #[test]
    fn test_untagged_items_produce_nothing() {
        let entries = vec![(item(50), vec![])];
        assert!(rank_trending(&entries, 10).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let entries: Vec<(ContentItem, Vec<Tag>)> = (0..5)
            .map(|i| (item(i), vec![tag(&format!("t{}", i))]))
            .collect();
        assert_eq!(rank_trending(&entries, 2).len(), 2);
    }
}
