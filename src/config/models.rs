//! Configuration data models

use crate::core::batch::BatchConfig;
use crate::core::confirm::PollConfig;
use crate::core::rate_limiter::RateLimitRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default folder for the config file and bulk ledgers
pub fn default_data_folder() -> String {
    "~/.config/solen".to_string()
}

/// Default confirmation worker pool size
pub fn default_pool_size() -> usize {
    200
}

/// Default status calls admitted per rate limit period
pub fn default_rate_limit_calls() -> u32 {
    100
}

/// Default rate limit period in seconds
pub fn default_rate_limit_period_secs() -> f64 {
    5.0
}

/// Default confirmation wall clock budget in seconds
pub fn default_confirm_timeout_secs() -> u64 {
    30
}

/// Default maximum status polls per signature
pub fn default_confirm_max_retries() -> u32 {
    60
}

/// Default sleep between status polls in milliseconds
pub fn default_poll_interval_ms() -> u64 {
    1000
}

/// Default pause after a transient submission failure in milliseconds
pub fn default_transient_backoff_ms() -> u64 {
    1000
}

/// The `[bulk]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "default_data_folder")]
    pub data_folder: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_rate_limit_calls")]
    pub rate_limit_calls: u32,
    #[serde(default = "default_rate_limit_period_secs")]
    pub rate_limit_period_secs: f64,
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,
    #[serde(default = "default_confirm_max_retries")]
    pub confirm_max_retries: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_transient_backoff_ms")]
    pub transient_backoff_ms: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder(),
            pool_size: default_pool_size(),
            rate_limit_calls: default_rate_limit_calls(),
            rate_limit_period_secs: default_rate_limit_period_secs(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            confirm_max_retries: default_confirm_max_retries(),
            poll_interval_ms: default_poll_interval_ms(),
            transient_backoff_ms: default_transient_backoff_ms(),
        }
    }
}

impl BulkConfig {
    pub fn data_folder(&self) -> PathBuf {
        crate::utils::expand_home(&self.data_folder)
    }

    /// Polling budget for confirmations, targeting finalized
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new()
            .with_interval(Duration::from_millis(self.poll_interval_ms))
            .with_timeout(Duration::from_secs(self.confirm_timeout_secs))
            .with_max_retries(self.confirm_max_retries)
    }

    /// Fan-out used by bulk confirmation and bulk reads
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new()
            .with_concurrency(self.pool_size)
            .with_rate_limits(vec![RateLimitRule::new(
                self.rate_limit_calls,
                Duration::from_secs_f64(self.rate_limit_period_secs),
            )])
    }

    pub fn transient_backoff(&self) -> Duration {
        Duration::from_millis(self.transient_backoff_ms)
    }
}

/// Settings resolved for one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub env: String,
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    /// Configured token mint; token commands need one
    pub token: Option<String>,
}
