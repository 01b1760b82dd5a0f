//! Rate Limiting Implementation
//!
//! Sliding window admission control for outgoing RPC traffic. Every rule caps
//! the number of operation starts inside a rolling window; an operation may
//! start only when all rules allow it.

mod limiter;
mod types;

pub use limiter::RateLimiter;
pub use types::RateLimitRule;
