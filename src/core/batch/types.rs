//! Batch runner configuration and result types

use crate::core::rate_limiter::RateLimitRule;
use crate::utils::error::SolenError;
use std::time::Duration;

/// Configuration for [`BatchRunner`](super::BatchRunner)
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum operations in flight (default: 200)
    pub concurrency: usize,
    /// Optional hard timeout per operation
    pub timeout: Option<Duration>,
    /// Start-rate rules shared by the whole batch (default: 100 per 5s)
    pub rate_limits: Vec<RateLimitRule>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 200,
            timeout: None,
            rate_limits: vec![RateLimitRule::new(100, Duration::from_secs(5))],
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set concurrency limit
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set timeout per operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the rate limit rules; an empty list disables rate limiting
    pub fn with_rate_limits(mut self, rules: Vec<RateLimitRule>) -> Self {
        self.rate_limits = rules;
        self
    }
}

/// Result of one operation in a batch
#[derive(Debug, Clone)]
pub struct BatchItemResult<R> {
    /// Position of the input in the submitted batch
    pub index: usize,
    pub result: std::result::Result<R, BatchError>,
    /// Time from start (after rate limit admission) to completion
    pub duration: Duration,
}

/// Failure of a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub message: String,
    pub transient: bool,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BatchError {}

impl From<SolenError> for BatchError {
    fn from(err: SolenError) -> Self {
        Self {
            transient: err.is_transient(),
            message: err.to_string(),
        }
    }
}
