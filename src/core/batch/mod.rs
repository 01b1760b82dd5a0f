//! Concurrent batch execution
//!
//! Runs one async operation per input under a bounded worker pool and a
//! sliding window rate limit, then hands back every result at once.

mod runner;
mod types;

pub use runner::BatchRunner;
pub use types::{BatchConfig, BatchError, BatchItemResult};
