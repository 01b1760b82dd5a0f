//! Signature status poller

use super::types::{ConfirmOutcome, ConfirmResult, PollConfig};
use crate::rpc::{Commitment, RpcClient};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Polls the remote ledger for the commitment of submitted transactions
#[derive(Clone)]
pub struct SignatureConfirmer {
    rpc: Arc<dyn RpcClient>,
    config: PollConfig,
}

impl SignatureConfirmer {
    pub fn new(rpc: Arc<dyn RpcClient>, config: PollConfig) -> Self {
        Self { rpc, config }
    }

    /// Same client and budget, different target commitment
    pub fn with_target(&self, target: Commitment) -> Self {
        Self {
            rpc: self.rpc.clone(),
            config: self.config.with_target(target),
        }
    }

    pub async fn confirm(&self, signature: &str) -> ConfirmResult {
        let outcome = self.poll(signature).await;
        ConfirmResult::new(signature, outcome, None)
    }

    /// Confirm and attach `tag` to the result so it can be matched back to
    /// its source after out-of-order completion
    pub async fn confirm_tagged<T>(&self, signature: &str, tag: T) -> ConfirmResult<T> {
        let outcome = self.poll(signature).await;
        ConfirmResult::new(signature, outcome, Some(tag))
    }

    async fn poll(&self, signature: &str) -> ConfirmOutcome {
        let PollConfig {
            target,
            interval,
            timeout,
            max_retries,
        } = self.config;
        let deadline = Instant::now() + timeout;
        let signatures = [signature.to_string()];
        let mut retries_left = max_retries.max(1);
        let mut last_seen: Option<Commitment> = None;
        let mut last_confirmations: Option<u64> = None;

        loop {
            retries_left -= 1;

            let remaining = deadline.saturating_duration_since(Instant::now());
            let query = self.rpc.get_signature_statuses(&signatures, true);
            let Ok(response) = tokio::time::timeout(remaining, query).await else {
                break;
            };

            match response {
                Err(e) => {
                    warn!(signature, "Unable to confirm transaction: {}", e);
                    return ConfirmOutcome::RemoteError(e.to_string());
                }
                Ok(statuses) => match statuses.into_iter().next().flatten() {
                    Some(status) => {
                        if let Some(err) = &status.err {
                            warn!(signature, "Transaction failed on chain: {}", err);
                            return ConfirmOutcome::TransactionFailed(err.to_string());
                        }

                        let reached = status.commitment();
                        last_seen = Some(reached);
                        if reached >= target {
                            debug!(signature, %reached, "Transaction confirmed");
                            return ConfirmOutcome::Reached(reached);
                        }

                        if status.confirmations != last_confirmations {
                            if let Some(count) = status.confirmations {
                                info!(signature, "Transaction confirmed by {} validators", count);
                            }
                            last_confirmations = status.confirmations;
                        }
                    }
                    None => debug!(signature, "Transaction not visible yet"),
                },
            }

            if retries_left == 0 {
                break;
            }
            tokio::time::sleep(interval).await;
            if Instant::now() >= deadline {
                break;
            }
        }

        warn!(
            signature,
            last_seen = ?last_seen,
            "Unable to confirm transaction within {:?} ({} polls)",
            timeout,
            max_retries.max(1) - retries_left
        );
        ConfirmOutcome::Exhausted { last_seen }
    }
}
