//! Confirmation poller configuration and results

use crate::rpc::Commitment;
use std::time::Duration;

/// Polling budget for one signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Commitment the signature must reach (default: finalized)
    pub target: Commitment,
    /// Sleep between polls (default: 1s)
    pub interval: Duration,
    /// Wall clock budget (default: 30s)
    pub timeout: Duration,
    /// Maximum number of status queries (default: 60)
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            target: Commitment::Finalized,
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            max_retries: 60,
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: Commitment) -> Self {
        self.target = target;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }
}

/// How polling ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Target reached; carries the commitment the node reported
    Reached(Commitment),
    /// The transaction landed but failed on chain
    TransactionFailed(String),
    /// The status query itself failed
    RemoteError(String),
    /// Retry or time budget exhausted; carries the last commitment seen
    Exhausted { last_seen: Option<Commitment> },
}

/// Outcome of confirming one signature, with the caller's correlation tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmResult<T = ()> {
    pub signature: String,
    pub confirmed: bool,
    pub outcome: ConfirmOutcome,
    pub tag: Option<T>,
}

impl<T> ConfirmResult<T> {
    pub(super) fn new(signature: &str, outcome: ConfirmOutcome, tag: Option<T>) -> Self {
        Self {
            signature: signature.to_string(),
            confirmed: matches!(outcome, ConfirmOutcome::Reached(_)),
            outcome,
            tag,
        }
    }
}
