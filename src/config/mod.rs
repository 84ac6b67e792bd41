pub mod duration;

pub use duration::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`Collector`](crate::Collector).
///
/// All fields have defaults, so a partial YAML document (or
/// `CollectorConfig::default()`) is enough to get a working collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Window length in seconds. Buckets older than this are evicted.
    #[serde(default = "default_capacity_secs")]
    pub capacity_secs: i64,

    /// Operations that finish cleanly but slower than this are classified
    /// as timeouts.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Maximum acceptable failure ratio before the current bucket reports
    /// unhealthy. Must be within [0, 1].
    #[serde(default = "default_error_tolerance")]
    pub error_tolerance: f64,
}

fn default_capacity_secs() -> i64 {
    10
}

fn default_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_error_tolerance() -> f64 {
    0.5
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            capacity_secs: default_capacity_secs(),
            timeout: default_timeout(),
            error_tolerance: default_error_tolerance(),
        }
    }
}

impl CollectorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: CollectorConfig =
            serde_yml::from_str(&content).with_context(|| "Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.capacity_secs <= 0 {
            return Err(ConfigError::InvalidCapacity(self.capacity_secs));
        }
        if !(0.0..=1.0).contains(&self.error_tolerance) {
            return Err(ConfigError::InvalidTolerance(self.error_tolerance));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("window capacity must be positive, got {0}")]
    InvalidCapacity(i64),

    #[error("error tolerance must be within [0, 1], got {0}")]
    InvalidTolerance(f64),

    #[error("timeout must be non-zero")]
    ZeroTimeout,
}

/// Builder for CollectorConfig
pub struct CollectorConfigBuilder {
    config: CollectorConfig,
}

impl CollectorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CollectorConfig::default(),
        }
    }

    pub fn capacity_secs(mut self, secs: i64) -> Self {
        self.config.capacity_secs = secs;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn error_tolerance(mut self, tolerance: f64) -> Self {
        self.config.error_tolerance = tolerance;
        self
    }

    pub fn build(self) -> CollectorConfig {
        self.config
    }
}

impl Default for CollectorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
