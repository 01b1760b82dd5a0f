//! Transaction confirmation polling
//!
//! Polls `getSignatureStatuses` until a signature reaches a target
//! commitment, the node reports an error, or the retry or wall clock budget
//! runs out. The commitment rank is authoritative; validator confirmation
//! counts are only logged.

mod poller;
mod types;

pub use poller::SignatureConfirmer;
pub use types::{ConfirmOutcome, ConfirmResult, PollConfig};
