//! Business logic layer: scorers, rankers and engagement counters.
//! Everything here is pure over repository snapshots except the counter
//! mutations, which delegate to the repository's atomic increments.

pub mod engagement;
pub mod keywords;
pub mod popularity;
pub mod relevance;
pub mod trending;
