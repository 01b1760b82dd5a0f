//! Bounded, rate limited fan-out of independent async operations

use super::types::{BatchConfig, BatchError, BatchItemResult};
use crate::core::rate_limiter::RateLimiter;
use crate::utils::error::{Result, SolenError};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Runs one operation per item with at most `concurrency` in flight and
/// starts admitted by the configured rate limit rules
pub struct BatchRunner {
    config: BatchConfig,
    limiter: Arc<RateLimiter>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.rate_limits.clone()));
        Self { config, limiter }
    }

    /// Execute `operation` for every item and wait for all of them.
    ///
    /// A failing or timed out operation becomes that item's own `Err` result;
    /// it never cancels the others. Results come back sorted by input index.
    ///
    /// ```rust,ignore
    /// let runner = BatchRunner::new(BatchConfig::new().with_concurrency(50));
    /// let results = runner
    ///     .run_all(signatures, |sig| async move { confirmer.confirm(&sig).await })
    ///     .await;
    /// ```
    pub async fn run_all<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        operation: F,
    ) -> Vec<BatchItemResult<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let operation = &operation;
        let limiter = &self.limiter;
        let timeout = self.config.timeout;

        let mut results: Vec<BatchItemResult<R>> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| async move {
                limiter.acquire().await;
                let start = Instant::now();

                let result = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, operation(item)).await {
                        Ok(result) => result,
                        Err(_) => Err(SolenError::timeout(format!(
                            "batch item {} timed out after {:?}",
                            index, limit
                        ))),
                    },
                    None => operation(item).await,
                };

                if let Err(e) = &result {
                    debug!(index, "Batch item failed: {}", e);
                }

                BatchItemResult {
                    index,
                    result: result.map_err(BatchError::from),
                    duration: start.elapsed(),
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        results.sort_by_key(|r| r.index);
        results
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}
