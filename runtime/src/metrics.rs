//! Metrics for store observability.
//!
//! Counters and histograms are emitted through the `metrics` facade. Nothing is
//! recorded unless the host application installs a recorder (for example a
//! Prometheus exporter).

use metrics::{describe_counter, describe_histogram};
use std::time::Duration;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total number of actions reduced by a store
pub const DISPATCH_TOTAL: &str = "store.dispatch.total";

/// Actions queued by a reentrant dispatch
pub const DISPATCH_QUEUED: &str = "store.dispatch.queued";

/// Actions rejected by the reentrancy policy or cascade limit
pub const DISPATCH_REJECTED: &str = "store.dispatch.rejected";

/// Time spent inside the root reducer
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Subscriber callbacks invoked
pub const SUBSCRIBERS_NOTIFIED: &str = "store.subscribers.notified";

/// Register metric descriptions with the installed recorder.
///
/// Call once after installing a recorder; calling it without one is harmless.
pub fn register_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of actions reduced by the store");
    describe_counter!(
        DISPATCH_QUEUED,
        "Actions dispatched from a subscriber and queued behind the current dispatch"
    );
    describe_counter!(
        DISPATCH_REJECTED,
        "Actions rejected by the reentrancy policy or the cascade limit"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken by the root reducer");
    describe_counter!(SUBSCRIBERS_NOTIFIED, "Subscriber callbacks invoked");
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action reduced by the root reducer.
    pub fn record_reduce(kind: &'static str, duration: Duration) {
        counter!(DISPATCH_TOTAL, "action" => kind).increment(1);
        histogram!(REDUCER_DURATION).record(duration.as_secs_f64());
    }

    /// Record an action queued by a reentrant dispatch.
    pub fn record_queued() {
        counter!(DISPATCH_QUEUED).increment(1);
    }

    /// Record a rejected dispatch.
    pub fn record_rejected(reason: &'static str) {
        counter!(DISPATCH_REJECTED, "reason" => reason).increment(1);
    }

    /// Record a notification pass.
    pub fn record_notified(count: usize) {
        counter!(SUBSCRIBERS_NOTIFIED).increment(count as u64);
    }
}
