//! Content Engagement & Discovery Engine
//!
//! Computes relevance-ranked recommendations, popularity and trending
//! rankings, and engagement counters (views, social shares) over a corpus
//! of published content, behind a cache-aside layer with explicit
//! invalidation. The content repository and key-value cache are injected
//! dependencies; the presentation layer consumes this crate as a library.
//!
//! # Modules
//!
//! - `engine`: the facade exposing the read/write operations
//! - `services`: scorers, rankers and engagement counters
//! - `repo`: content repository trait plus Postgres and in-memory backends
//! - `models`: data structures for items, tags, shares and ranked outputs
//! - `error`: error types and boundary status mapping
//! - `config`: configuration management
//! - `metrics`: observability counters
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repo;
pub mod services;

pub use config::{Config, DiscoveryConfig};
pub use engine::DiscoveryEngine;
pub use error::{EngineError, ErrorKind, Result};
