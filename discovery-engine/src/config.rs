//! Configuration management for the discovery engine
//!
//! This module handles loading configuration from environment variables.
//! The engine itself is constructed with injected repository and cache
//! dependencies; this configuration covers the backing connections and
//! the cache/scoring tunables.

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache (Redis) configuration
    pub cache: CacheConfig,
    /// Discovery tunables (TTLs, relevance weights)
    pub discovery: DiscoveryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
}

/// Discovery tunables: cache TTLs per result family and relevance weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub featured_ttl_secs: u64,
    pub related_ttl_secs: u64,
    pub popular_ttl_secs: u64,
    pub trending_ttl_secs: u64,
    pub tag_weight: f64,
    pub category_weight: f64,
    pub keyword_weight: f64,
    pub recency_bonus: f64,
    pub recency_window_days: i64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            featured_ttl_secs: engage_cache::ttl::FEATURED,
            related_ttl_secs: engage_cache::ttl::RELATED,
            popular_ttl_secs: engage_cache::ttl::POPULAR,
            trending_ttl_secs: engage_cache::ttl::TRENDING,
            tag_weight: 3.0,
            category_weight: 2.0,
            keyword_weight: 1.0,
            recency_bonus: 0.5,
            recency_window_days: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/discovery".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            discovery: DiscoveryConfig {
                featured_ttl_secs: parse_env_or("DISCOVERY_FEATURED_TTL_SECS", engage_cache::ttl::FEATURED)?,
                related_ttl_secs: parse_env_or("DISCOVERY_RELATED_TTL_SECS", engage_cache::ttl::RELATED)?,
                popular_ttl_secs: parse_env_or("DISCOVERY_POPULAR_TTL_SECS", engage_cache::ttl::POPULAR)?,
                trending_ttl_secs: parse_env_or("DISCOVERY_TRENDING_TTL_SECS", engage_cache::ttl::TRENDING)?,
                tag_weight: parse_env_or("DISCOVERY_TAG_WEIGHT", 3.0)?,
                category_weight: parse_env_or("DISCOVERY_CATEGORY_WEIGHT", 2.0)?,
                keyword_weight: parse_env_or("DISCOVERY_KEYWORD_WEIGHT", 1.0)?,
                recency_bonus: parse_env_or("DISCOVERY_RECENCY_BONUS", 0.5)?,
                recency_window_days: parse_env_or("DISCOVERY_RECENCY_WINDOW_DAYS", 30)?,
            },
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        std::env::remove_var("DISCOVERY_POPULAR_TTL_SECS");
        let config = Config::from_env().unwrap();
        assert_eq!(config.discovery.popular_ttl_secs, engage_cache::ttl::POPULAR);
        assert_eq!(config.discovery.tag_weight, 3.0);
        assert_eq!(config.discovery.recency_window_days, 30);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("DISCOVERY_POPULAR_TTL_SECS", "120");
        let config = Config::from_env().unwrap();
        assert_eq!(config.discovery.popular_ttl_secs, 120);
        std::env::remove_var("DISCOVERY_POPULAR_TTL_SECS");
    }

    #[test]
    #[serial]
    fn test_invalid_env_is_an_error() {
        std::env::set_var("DISCOVERY_TAG_WEIGHT", "not-a-number");
        assert!(Config::from_env().is_err());
        std::env::remove_var("DISCOVERY_TAG_WEIGHT");
    }
}
