//! Core engine
//!
//! The bulk job engine and the concurrency pieces it is built from.

pub mod batch;
pub mod bulk;
pub mod confirm;
pub mod rate_limiter;
