//! Build, sign, send and confirm one transaction

use super::retry::RetryPolicy;
use crate::chain::{Instruction, Keypair, Transaction};
use crate::core::confirm::{ConfirmOutcome, SignatureConfirmer};
use crate::rpc::{Commitment, RpcClient, SendOptions};
use crate::utils::error::{Result, SolenError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sends transactions signed by one payer.
///
/// The transaction is built and signed once, so every send retry carries the
/// same bytes and signature and can never double-spend.
pub struct SignedOperation<'a> {
    rpc: Arc<dyn RpcClient>,
    payer: &'a Keypair,
    confirmer: SignatureConfirmer,
    retry: RetryPolicy,
}

impl<'a> SignedOperation<'a> {
    /// `confirmer` is retargeted to `confirmed`
    pub fn new(rpc: Arc<dyn RpcClient>, payer: &'a Keypair, confirmer: &SignatureConfirmer) -> Self {
        Self {
            rpc,
            payer,
            confirmer: confirmer.with_target(Commitment::Confirmed),
            retry: RetryPolicy::default(),
        }
    }

    /// Send `instructions` and return the transaction signature.
    ///
    /// A send failure is an error. Unless `skip_confirm` is set, waits for
    /// `confirmed`; a transaction that failed on chain is an error, while a
    /// wait that merely runs out still returns the signature.
    pub async fn execute(&self, instructions: &[Instruction], skip_confirm: bool) -> Result<String> {
        let blockhash = self.rpc.get_latest_blockhash(Commitment::Finalized).await?;
        let transaction =
            Transaction::new_signed(instructions, self.payer, &[], &blockhash.blockhash)?;
        let signature = transaction.signature();
        let wire = transaction.to_base64();

        let options = if skip_confirm {
            SendOptions {
                skip_preflight: true,
                preflight_commitment: Commitment::Processed,
            }
        } else {
            SendOptions {
                skip_preflight: false,
                preflight_commitment: Commitment::Confirmed,
            }
        };

        let rpc = &self.rpc;
        let wire = wire.as_str();
        let sent = self
            .retry
            .call(|| async move {
                rpc.send_transaction(wire, options)
                    .await
                    .map_err(SolenError::from)
            })
            .await?;
        if sent != signature {
            debug!("Node reported signature {} for {}", sent, signature);
        }
        info!(signature = %sent, "Transaction sent");

        if skip_confirm {
            return Ok(sent);
        }

        let result = self.confirmer.confirm(&sent).await;
        match result.outcome {
            ConfirmOutcome::Reached(rank) => {
                debug!(signature = %sent, %rank, "Transaction confirmed");
                Ok(sent)
            }
            ConfirmOutcome::TransactionFailed(err) => Err(SolenError::remote_rejected(format!(
                "transaction {} failed: {}",
                sent, err
            ))),
            ConfirmOutcome::RemoteError(_) | ConfirmOutcome::Exhausted { .. } => {
                warn!(signature = %sent, "Transaction sent but not confirmed yet");
                Ok(sent)
            }
        }
    }
}
