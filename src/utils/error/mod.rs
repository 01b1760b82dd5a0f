//! Error handling for solen
//!
//! One error type covers the whole crate. Remote failures are classified once,
//! in the RPC layer, so callers can branch on [`SolenError::is_transient`]
//! instead of inspecting message text.

mod conversions;
mod helpers;
mod types;

pub use types::{Result, SolenError};
