//! Data models for the discovery engine
//!
//! This module defines structures for:
//! - ContentItem: published content units eligible for discovery/ranking
//! - Tag / Category: many-to-many labels on content items
//! - Comment: per-item comments (only approved ones feed popularity)
//! - ShareRecord: per (item, platform) social share counters
//! - Timeframe / SharePlatform: closed input enumerations
//! - Derived ranking outputs (never persisted back onto items)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::EngineError;

/// Publication status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
        }
    }
}

impl TryFrom<String> for ContentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            other => Err(format!("unknown content status '{}'", other)),
        }
    }
}

/// A content unit (post) owned by the content repository
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub is_featured: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    /// Text fed into keyword extraction for relevance scoring
    pub fn keyword_text(&self) -> String {
        match &self.excerpt {
            Some(excerpt) => format!("{} {}", self.title, excerpt),
            None => self.title.clone(),
        }
    }
}

/// Display label attached to items, many-to-many
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// Editorial grouping of items, many-to-many
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// Comment on a content item. Only approved comments count toward popularity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub item_id: Uuid,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Closed set of share platforms accepted by `record_share`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Facebook,
    Twitter,
    Linkedin,
    Reddit,
    Pinterest,
    Whatsapp,
}

impl SharePlatform {
    /// Every recognized platform, used to build complete count maps
    pub const ALL: [SharePlatform; 6] = [
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::Linkedin,
        SharePlatform::Reddit,
        SharePlatform::Pinterest,
        SharePlatform::Whatsapp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "facebook",
            SharePlatform::Twitter => "twitter",
            SharePlatform::Linkedin => "linkedin",
            SharePlatform::Reddit => "reddit",
            SharePlatform::Pinterest => "pinterest",
            SharePlatform::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(SharePlatform::Facebook),
            "twitter" => Ok(SharePlatform::Twitter),
            "linkedin" => Ok(SharePlatform::Linkedin),
            "reddit" => Ok(SharePlatform::Reddit),
            "pinterest" => Ok(SharePlatform::Pinterest),
            "whatsapp" => Ok(SharePlatform::Whatsapp),
            other => Err(EngineError::Validation(format!(
                "unrecognized share platform '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SharePlatform {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse().map_err(|e: EngineError| e.to_string())
    }
}

/// Per (item, platform) share counter. Unique per pair, created lazily on
/// first share.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShareRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    #[sqlx(try_from = "String")]
    pub platform: SharePlatform,
    pub share_count: i64,
    pub last_shared_at: DateTime<Utc>,
}

/// Complete per-platform share count map; absent platforms read as 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareCounts {
    pub counts: BTreeMap<SharePlatform, i64>,
}

impl ShareCounts {
    /// Build a full map over every platform from whatever records exist
    pub fn from_records(records: &[ShareRecord]) -> Self {
        let mut counts: BTreeMap<SharePlatform, i64> = SharePlatform::ALL
            .iter()
            .map(|platform| (*platform, 0))
            .collect();
        for record in records {
            *counts.entry(record.platform).or_insert(0) += record.share_count;
        }
        Self { counts }
    }

    pub fn get(&self, platform: SharePlatform) -> i64 {
        self.counts.get(&platform).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.counts.values().sum()
    }
}

/// Lookback window for popularity ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    Month,
    Year,
    All,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
            Timeframe::All => "all",
        }
    }

    /// Number of lookback days, `None` for an unbounded window
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            Timeframe::Week => Some(7),
            Timeframe::Month => Some(30),
            Timeframe::Year => Some(365),
            Timeframe::All => None,
        }
    }

    /// Earliest `created_at` admitted by this window at time `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.lookback_days()
            .map(|days| now - chrono::Duration::days(days))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            "all" => Ok(Timeframe::All),
            other => Err(EngineError::Validation(format!(
                "unrecognized timeframe '{}'",
                other
            ))),
        }
    }
}

/// Relevance-scored candidate returned by `get_related`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: ContentItem,
    pub score: f64,
}

/// Engagement-scored item returned by `get_popular`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularItem {
    pub item: ContentItem,
    pub approved_comments: i64,
    pub total_shares: i64,
    pub engagement_score: i64,
}

/// Tag ranked by recent activity, returned by `get_trending_tags`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingTag {
    pub tag: Tag,
    pub recent_post_count: i64,
    pub total_views: i64,
    pub engagement_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!(
            "twitter".parse::<SharePlatform>().unwrap(),
            SharePlatform::Twitter
        );
        assert_eq!(
            "FACEBOOK".parse::<SharePlatform>().unwrap(),
            SharePlatform::Facebook
        );
        assert!("carrier-pigeon".parse::<SharePlatform>().is_err());
    }

    #[test]
    fn test_timeframe_parse_and_lookback() {
        assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::Week);
        assert_eq!(Timeframe::Week.lookback_days(), Some(7));
        assert_eq!(Timeframe::Month.lookback_days(), Some(30));
        assert_eq!(Timeframe::Year.lookback_days(), Some(365));
        assert_eq!(Timeframe::All.lookback_days(), None);
        assert!("fortnight".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_share_counts_full_map() {
        let item_id = Uuid::new_v4();
        let records = vec![ShareRecord {
            id: Uuid::new_v4(),
            item_id,
            platform: SharePlatform::Facebook,
            share_count: 3,
            last_shared_at: Utc::now(),
        }];

        let counts = ShareCounts::from_records(&records);
        assert_eq!(counts.counts.len(), SharePlatform::ALL.len());
        assert_eq!(counts.get(SharePlatform::Facebook), 3);
        assert_eq!(counts.get(SharePlatform::Reddit), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_keyword_text_handles_missing_excerpt() {
        let mut item = ContentItem {
            id: Uuid::new_v4(),
            title: "Hello World".to_string(),
            body: String::new(),
            excerpt: None,
            status: ContentStatus::Published,
            is_featured: false,
            view_count: 0,
            created_at: Utc::now(),
        };
        assert_eq!(item.keyword_text(), "Hello World");

        item.excerpt = Some("an excerpt".to_string());
        assert_eq!(item.keyword_text(), "Hello World an excerpt");
    }
}
