//! Core rate limiter implementation

use super::types::{RateLimitResult, RateLimitRule};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Multi-rule sliding window limiter
#[derive(Debug)]
pub struct RateLimiter {
    rules: Vec<RateLimitRule>,
    /// Start timestamps, one window per rule
    windows: Mutex<Vec<VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(rules: Vec<RateLimitRule>) -> Self {
        let windows = rules.iter().map(|_| VecDeque::new()).collect();
        Self {
            rules,
            windows: Mutex::new(windows),
        }
    }

    /// Check every rule and, when `record` is set and all allow, record the
    /// start in each window under a single lock acquisition
    pub(crate) fn check(&self, record: bool) -> RateLimitResult {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        let mut allowed = true;
        let mut retry_after: Option<Duration> = None;
        let mut current_count = 0;
        let mut limit = u32::MAX;

        for (rule, window) in self.rules.iter().zip(windows.iter_mut()) {
            while window
                .front()
                .is_some_and(|&t| now.duration_since(t) >= rule.period)
            {
                window.pop_front();
            }

            let count = window.len() as u32;
            if rule.max_calls.saturating_sub(count) < limit.saturating_sub(current_count) {
                current_count = count;
                limit = rule.max_calls;
            }

            if count >= rule.max_calls {
                allowed = false;
                // The oldest start leaves the window first
                let wait = window
                    .front()
                    .map(|&oldest| rule.period.saturating_sub(now.duration_since(oldest)))
                    .unwrap_or(rule.period);
                retry_after = Some(retry_after.map_or(wait, |w| w.max(wait)));
            }
        }

        if allowed && record {
            for window in windows.iter_mut() {
                window.push_back(now);
            }
            current_count += 1;
        }

        RateLimitResult {
            allowed,
            current_count,
            limit,
            retry_after,
        }
    }

    /// Wait until a start is admitted, then record it
    pub async fn acquire(&self) {
        loop {
            let result = self.check(true);
            if result.allowed {
                return;
            }
            let wait = result
                .retry_after
                .unwrap_or(Duration::from_millis(10))
                .max(Duration::from_millis(1));
            debug!(
                "Rate limit reached ({}/{}), waiting {:?}",
                result.current_count, result.limit, wait
            );
            tokio::time::sleep(wait).await;
        }
    }
}
