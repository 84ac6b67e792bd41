use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::window::OutcomeKind;

/// Register metric descriptions with the installed recorder.
///
/// The crate never installs a recorder itself; the embedding process owns
/// that choice (and may install none, in which case every call below is a
/// no-op).
pub fn init_metrics() {
    describe_counter!(
        "vitals_outcomes_total",
        "Total operation outcomes recorded, labeled by kind"
    );
    describe_counter!(
        "vitals_outcomes_dropped_total",
        "Outcomes dropped because no bucket existed for their second"
    );
    describe_counter!(
        "vitals_buckets_evicted_total",
        "Buckets removed after sliding out of the window"
    );
    describe_gauge!(
        "vitals_window_buckets",
        "Buckets currently retained in the window"
    );
    describe_gauge!("vitals_healthy", "Current health signal (1=healthy, 0=unhealthy)");
}

pub struct Metrics;

impl Metrics {
    /// Record a classified outcome.
    #[inline]
    pub fn record_outcome(kind: OutcomeKind) {
        let labels = [("kind", kind.as_str().to_string())];
        counter!("vitals_outcomes_total", &labels).increment(1);
    }

    /// Record an outcome that found no bucket to land in.
    #[inline]
    pub fn record_dropped(kind: OutcomeKind) {
        let labels = [("kind", kind.as_str().to_string())];
        counter!("vitals_outcomes_dropped_total", &labels).increment(1);
    }

    /// Record buckets removed by an eviction sweep.
    #[inline]
    pub fn record_evicted(count: usize) {
        counter!("vitals_buckets_evicted_total").increment(count as u64);
    }

    /// Record the number of buckets currently retained.
    #[inline]
    pub fn set_window_size(size: usize) {
        gauge!("vitals_window_buckets").set(size as f64);
    }

    /// Publish the health signal.
    #[inline]
    pub fn set_health(healthy: bool) {
        gauge!("vitals_healthy").set(if healthy { 1.0 } else { 0.0 });
    }
}
