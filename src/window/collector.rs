use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::{CollectorConfig, ConfigError};
use crate::metrics::Metrics;

use super::bucket::{Bucket, OutcomeKind};

/// Sliding-window health collector.
///
/// Outcomes of executed operations land in per-second [`Bucket`]s; only the
/// most recent `capacity_secs` worth of buckets is retained. The health
/// signal is derived from the current second's bucket alone, which makes it
/// cheap and strongly recency-biased — exactly what a circuit breaker or
/// load-shedding layer wants to poll.
///
/// The collector is an owned object: construct one per tracked dependency
/// and share it behind an `Arc`. There is no global registry.
pub struct Collector {
    buckets: RwLock<HashMap<i64, Arc<Bucket>>>,
    capacity_secs: i64,
    timeout: Duration,
    error_tolerance: f64,
}

impl Collector {
    /// Build a collector from a validated configuration.
    pub fn new(config: CollectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            buckets: RwLock::new(HashMap::new()),
            capacity_secs: config.capacity_secs,
            timeout: config.timeout.as_std(),
            error_tolerance: config.error_tolerance,
        })
    }

    fn now_unix_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Bucket for the current second, created on first reference.
    ///
    /// Double-checked: shared probe first, then an exclusive re-check
    /// before insert, so callers racing on the same second always land on
    /// the one bucket instance for that key.
    pub fn current_bucket(&self) -> Arc<Bucket> {
        let now = Self::now_unix_secs();

        {
            let buckets = self.buckets.read();
            if let Some(bucket) = buckets.get(&now) {
                return Arc::clone(bucket);
            }
        }

        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(now).or_insert_with(|| Arc::new(Bucket::new()));
        Arc::clone(bucket)
    }

    /// Drop every bucket that has slid out of the window.
    ///
    /// Runs after each recorded operation rather than on a timer, so the
    /// sweep cadence follows traffic. An idle collector keeps its stale
    /// buckets until the next operation arrives.
    pub fn evict_outdated(&self) {
        let cutoff = Self::now_unix_secs() - self.capacity_secs;

        let mut buckets = self.buckets.write();
        let before = buckets.len();
        buckets.retain(|&second, _| second > cutoff);
        let evicted = before - buckets.len();

        if evicted > 0 {
            debug!(evicted, cutoff, "evicted stale buckets");
            Metrics::record_evicted(evicted);
        }
        Metrics::set_window_size(buckets.len());
    }

    /// Run `work`, classify its outcome, and record it against the second
    /// the call started in.
    ///
    /// Classification, in priority order: an error from `work` is a
    /// failure; a clean return slower than the configured timeout is a
    /// timeout; anything else is a success. The collector never preempts
    /// `work` — deadline and cancellation belong to the work itself (wrap
    /// it in `tokio::time::timeout` if enforcement is needed); only the
    /// elapsed wall-clock time after the future resolves is compared.
    ///
    /// The outcome is recorded only if a bucket already exists for the
    /// starting second; otherwise it is dropped without creating one.
    /// `work`'s error is consumed for classification and not returned.
    ///
    /// No lock is held while `work` runs, so long-running work never
    /// stalls concurrent health queries.
    pub async fn execute<F, Fut, E>(&self, work: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        let start_second = Self::now_unix_secs();
        let start = Instant::now();

        let outcome = match work().await {
            Err(err) => {
                debug!(error = %err, "operation failed");
                OutcomeKind::Failure
            }
            Ok(()) if start.elapsed() >= self.timeout => OutcomeKind::Timeout,
            Ok(()) => OutcomeKind::Success,
        };

        {
            let buckets = self.buckets.read();
            match buckets.get(&start_second) {
                Some(bucket) => {
                    bucket.increment(outcome);
                    Metrics::record_outcome(outcome);
                    trace!(second = start_second, kind = outcome.as_str(), "recorded outcome");
                }
                None => {
                    Metrics::record_dropped(outcome);
                    trace!(
                        second = start_second,
                        kind = outcome.as_str(),
                        "no bucket for second, outcome dropped"
                    );
                }
            }
        }

        self.evict_outdated();
    }

    /// Health of the current second's bucket.
    ///
    /// Creates the bucket if absent, so a collector that just went idle
    /// reports healthy instead of consulting stale data.
    pub fn is_healthy(&self) -> bool {
        let healthy = self.current_bucket().is_healthy(self.error_tolerance);
        Metrics::set_health(healthy);
        healthy
    }

    /// Aggregated snapshot across every bucket still inside the window.
    pub fn stats(&self) -> CollectorStats {
        let buckets = self.buckets.read();
        let mut stats = CollectorStats {
            buckets: buckets.len(),
            ..Default::default()
        };
        for bucket in buckets.values() {
            let snap = bucket.snapshot();
            stats.success += snap.success as u64;
            stats.failure += snap.failure as u64;
            stats.timeout += snap.timeout as u64;
        }
        stats
    }
}

/// Window-wide counter totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub buckets: usize,
    pub success: u64,
    pub failure: u64,
    pub timeout: u64,
}
