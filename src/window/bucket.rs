use parking_lot::RwLock;

/// Mutually exclusive classification of one executed operation.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
    Timeout,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Failure => "failure",
            OutcomeKind::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    success: u32,
    failure: u32,
    timeout: u32,
}

/// One-second accumulator of operation outcomes.
///
/// Counters only ever increment; the only way counts disappear is the
/// whole bucket sliding out of the collector's window.
#[derive(Debug, Default)]
pub struct Bucket {
    counts: RwLock<Counts>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn increment(&self, kind: OutcomeKind) {
        let mut counts = self.counts.write();
        match kind {
            OutcomeKind::Success => counts.success += 1,
            OutcomeKind::Failure => counts.failure += 1,
            OutcomeKind::Timeout => counts.timeout += 1,
        }
    }

    /// Whether the failure ratio in this bucket is below `tolerance`.
    ///
    /// A bucket with nothing recorded is healthy: no data is not evidence
    /// of failure.
    pub fn is_healthy(&self, tolerance: f64) -> bool {
        let counts = self.counts.read();
        let total = counts.success + counts.failure + counts.timeout;
        if total == 0 {
            return true;
        }
        // Fractional ratio: integer division would truncate to 0 whenever
        // failure < total.
        (counts.failure as f64) / (total as f64) < tolerance
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> BucketStats {
        let counts = self.counts.read();
        BucketStats {
            success: counts.success,
            failure: counts.failure,
            timeout: counts.timeout,
        }
    }
}

/// Counter snapshot for a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStats {
    pub success: u32,
    pub failure: u32,
    pub timeout: u32,
}

impl BucketStats {
    pub fn total(&self) -> u32 {
        self.success + self.failure + self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_bucket_is_healthy() {
        let bucket = Bucket::new();
        assert!(bucket.is_healthy(0.0));
        assert!(bucket.is_healthy(0.5));
        assert!(bucket.is_healthy(1.0));
    }

    #[test]
    fn test_failure_ratio_is_fractional() {
        let bucket = Bucket::new();
        for _ in 0..3 {
            bucket.increment(OutcomeKind::Failure);
        }
        for _ in 0..7 {
            bucket.increment(OutcomeKind::Success);
        }

        // ratio = 3/10 = 0.3; an integer ratio would be 0 and always pass
        assert!(bucket.is_healthy(0.5));
        assert!(!bucket.is_healthy(0.2));
    }

    #[test]
    fn test_ratio_equal_to_tolerance_is_unhealthy() {
        let bucket = Bucket::new();
        bucket.increment(OutcomeKind::Failure);
        for _ in 0..3 {
            bucket.increment(OutcomeKind::Success);
        }

        // 1/4 = 0.25; the comparison is strictly-below
        assert!(!bucket.is_healthy(0.25));
        assert!(bucket.is_healthy(0.26));
    }

    #[test]
    fn test_timeouts_count_toward_total_not_failures() {
        let bucket = Bucket::new();
        for _ in 0..9 {
            bucket.increment(OutcomeKind::Timeout);
        }
        assert!(bucket.is_healthy(0.1));

        // 1 failure / 10 total = 0.1, not below 0.1
        bucket.increment(OutcomeKind::Failure);
        assert!(!bucket.is_healthy(0.1));
    }

    #[test]
    fn test_concurrent_increments_lose_no_updates() {
        let bucket = Arc::new(Bucket::new());
        let threads = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let bucket = Arc::clone(&bucket);
                std::thread::spawn(move || {
                    for n in 0..per_thread {
                        let kind = match (i + n) % 3 {
                            0 => OutcomeKind::Success,
                            1 => OutcomeKind::Failure,
                            _ => OutcomeKind::Timeout,
                        };
                        bucket.increment(kind);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = bucket.snapshot();
        assert_eq!(stats.total(), (threads * per_thread) as u32);
    }

    #[test]
    fn test_snapshot_copies_counts() {
        let bucket = Bucket::new();
        bucket.increment(OutcomeKind::Success);
        bucket.increment(OutcomeKind::Success);
        bucket.increment(OutcomeKind::Timeout);

        let stats = bucket.snapshot();
        assert_eq!(stats.success, 2);
        assert_eq!(stats.failure, 0);
        assert_eq!(stats.timeout, 1);
        assert_eq!(stats.total(), 3);
    }
}
