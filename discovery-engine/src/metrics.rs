use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Total discovery reads segmented by operation and data source (cache, computed).
    pub static ref DISCOVERY_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discovery_request_total",
        "Total discovery read requests segmented by operation and source",
        &["operation", "source"]
    )
    .expect("failed to register discovery_request_total");

    /// Engagement writes segmented by operation (view, share).
    pub static ref ENGAGEMENT_WRITE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_write_total",
        "Total engagement counter writes segmented by operation",
        &["operation"]
    )
    .expect("failed to register engagement_write_total");

    /// Best-effort invalidation failures, segmented by key family.
    pub static ref INVALIDATION_FAILURE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "discovery_invalidation_failure_total",
        "Cache invalidation failures swallowed after engagement writes",
        &["family"]
    )
    .expect("failed to register discovery_invalidation_failure_total");
}
