mod bucket;
mod collector;

pub use bucket::{Bucket, BucketStats, OutcomeKind};
pub use collector::{Collector, CollectorStats};
