//! Configuration validation

use super::models::BulkConfig;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for BulkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.data_folder.trim().is_empty() {
            return Err("data_folder cannot be empty".to_string());
        }
        if self.pool_size == 0 {
            return Err("pool_size must be greater than 0".to_string());
        }
        if self.rate_limit_calls == 0 {
            return Err("rate_limit_calls must be greater than 0".to_string());
        }
        if !self.rate_limit_period_secs.is_finite() || self.rate_limit_period_secs <= 0.0 {
            return Err("rate_limit_period_secs must be a positive number".to_string());
        }
        if self.confirm_timeout_secs == 0 {
            return Err("confirm_timeout_secs must be greater than 0".to_string());
        }
        if self.confirm_max_retries == 0 {
            return Err("confirm_max_retries must be greater than 0".to_string());
        }
        Ok(())
    }
}
