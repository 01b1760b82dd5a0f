//! Rate limiter types

use std::time::Duration;

/// At most `max_calls` starts in any rolling `period`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub max_calls: u32,
    pub period: Duration,
}

impl RateLimitRule {
    pub fn new(max_calls: u32, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
        }
    }
}

/// Result of a single admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RateLimitResult {
    /// Whether the start is allowed
    pub allowed: bool,
    /// Starts recorded in the tightest window
    pub current_count: u32,
    /// Limit of the tightest window
    pub limit: u32,
    /// How long to wait before the next start can be admitted
    pub retry_after: Option<Duration>,
}
