//! Pairwise relevance scoring for related-item recommendations
//!
//! Additive weighted model over shared tags, shared categories, keyword
//! overlap and recency. Scores are derived per query and never persisted.

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::DiscoveryConfig;
use crate::models::{ContentItem, ScoredItem};
use crate::services::keywords::extract_keywords;

/// Scoring weights; defaults follow the documented model
/// (+3 per tag, +2 per category, +1 per keyword, +0.5 recency bonus).
#[derive(Debug, Clone)]
pub struct RelevanceWeights {
    pub tag: f64,
    pub category: f64,
    pub keyword: f64,
    pub recency_bonus: f64,
    pub recency_window_days: i64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            tag: 3.0,
            category: 2.0,
            keyword: 1.0,
            recency_bonus: 0.5,
            recency_window_days: 30,
        }
    }
}

impl From<&DiscoveryConfig> for RelevanceWeights {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            tag: config.tag_weight,
            category: config.category_weight,
            keyword: config.keyword_weight,
            recency_bonus: config.recency_bonus,
            recency_window_days: config.recency_window_days,
        }
    }
}

/// An item plus the signal sets relevance scoring needs
#[derive(Debug, Clone)]
pub struct ItemSignals {
    pub item: ContentItem,
    pub tag_ids: HashSet<Uuid>,
    pub category_ids: HashSet<Uuid>,
    pub keywords: HashSet<String>,
}

impl ItemSignals {
    pub fn new(item: ContentItem, tag_ids: HashSet<Uuid>, category_ids: HashSet<Uuid>) -> Self {
        let keywords = extract_keywords(&item.keyword_text());
        Self {
            item,
            tag_ids,
            category_ids,
            keywords,
        }
    }
}

/// Relevance of `candidate` with respect to `origin` at time `now`.
/// Always >= 0; unrelated items score exactly 0.
pub fn relevance_score(
    origin: &ItemSignals,
    candidate: &ItemSignals,
    now: DateTime<Utc>,
    weights: &RelevanceWeights,
) -> f64 {
    let shared_tags = origin.tag_ids.intersection(&candidate.tag_ids).count();
    let shared_categories = origin
        .category_ids
        .intersection(&candidate.category_ids)
        .count();
    let shared_keywords = origin.keywords.intersection(&candidate.keywords).count();

    let mut score = shared_tags as f64 * weights.tag
        + shared_categories as f64 * weights.category
        + shared_keywords as f64 * weights.keyword;

    let recency_cutoff = now - Duration::days(weights.recency_window_days);
    if candidate.item.created_at >= recency_cutoff {
        score += weights.recency_bonus;
    }

    score
}

/// Rank candidates against `origin`: the origin itself and zero-score
/// candidates are excluded, ordering is score descending with candidate id
/// ascending as the deterministic tie-break.
pub fn rank_related(
    origin: &ItemSignals,
    candidates: &[ItemSignals],
    limit: usize,
    now: DateTime<Utc>,
    weights: &RelevanceWeights,
) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = candidates
        .iter()
        .filter(|candidate| candidate.item.id != origin.item.id)
        .map(|candidate| ScoredItem {
            item: candidate.item.clone(),
            score: relevance_score(origin, candidate, now, weights),
        })
        .filter(|scored| scored.score > 0.0)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item.id.cmp(&b.item.id))
    });

    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentStatus;

    fn item(title: &str, created_at: DateTime<Utc>) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: String::new(),
            excerpt: None,
            status: ContentStatus::Published,
            is_featured: false,
            view_count: 0,
            created_at,
        }
    }

    fn signals(title: &str, tags: &[Uuid], categories: &[Uuid]) -> ItemSignals {
        ItemSignals::new(
            item(title, Utc::now()),
            tags.iter().copied().collect(),
            categories.iter().copied().collect(),
        )
    }

    #[test]
    fn test_one_shared_tag_plus_recency() {
        let django = Uuid::new_v4();
        let ml = Uuid::new_v4();
        let python = Uuid::new_v4();
        let tech = Uuid::new_v4();
        let ai = Uuid::new_v4();

        let a = signals("alpha", &[python, django], &[tech]);
        let b = signals("beta", &[django, ml], &[ai]);

        let score = relevance_score(&a, &b, Utc::now(), &RelevanceWeights::default());
        // One shared tag (3.0) plus the recency bonus (0.5)
        assert_eq!(score, 3.5);
    }

    #[test]
    fn test_no_recency_bonus_for_old_candidates() {
        let shared = Uuid::new_v4();
        let a = signals("alpha", &[shared], &[]);
        let mut b = signals("beta", &[shared], &[]);
        b.item.created_at = Utc::now() - Duration::days(45);

        let score = relevance_score(&a, &b, Utc::now(), &RelevanceWeights::default());
        assert_eq!(score, 3.0);
    }

    #[test]
    fn test_keyword_overlap_counts_once_per_keyword() {
        let a = signals("Rust async patterns", &[], &[]);
        let b = signals("Understanding async Rust", &[], &[]);

        let score = relevance_score(&a, &b, Utc::now(), &RelevanceWeights::default());
        // "rust" and "async" shared (+2.0) plus recency (+0.5)
        assert_eq!(score, 2.5);
    }

    #[test]
    fn test_rank_excludes_origin_and_zero_scores() {
        let shared = Uuid::new_v4();
        let origin = signals("origin", &[shared], &[]);
        let related = signals("candidate", &[shared], &[]);
        let unrelated = {
            let mut s = signals("elsewhere entirely", &[], &[]);
            // Outside the recency window so the bonus cannot leak in
            s.item.created_at = Utc::now() - Duration::days(60);
            s
        };

        let candidates = vec![origin.clone(), related.clone(), unrelated];
        let ranked = rank_related(
            &origin,
            &candidates,
            10,
            Utc::now(),
            &RelevanceWeights::default(),
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item.id, related.item.id);
    }

    #[test]
    fn test_tie_break_is_candidate_id_ascending() {
        let shared = Uuid::new_v4();
        let origin = signals("origin", &[shared], &[]);
        let c1 = signals("one", &[shared], &[]);
        let c2 = signals("two", &[shared], &[]);

        let candidates = vec![c1.clone(), c2.clone()];
        let ranked = rank_related(
            &origin,
            &candidates,
            10,
            Utc::now(),
            &RelevanceWeights::default(),
        );

        let mut expected = [c1.item.id, c2.item.id];
        expected.sort();
        let got: Vec<Uuid> = ranked.iter().map(|s| s.item.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_limit_truncates() {
        let shared = Uuid::new_v4();
        let origin = signals("origin", &[shared], &[]);
        let candidates: Vec<ItemSignals> =
            (0..5).map(|i| signals(&format!("c{}", i), &[shared], &[])).collect();

        let ranked = rank_related(
            &origin,
            &candidates,
            2,
            Utc::now(),
            &RelevanceWeights::default(),
        );
        assert_eq!(ranked.len(), 2);
    }
}
