//! In-memory cluster for bulk job tests
//!
//! Only signature statuses are modelled; every other call fails with a
//! permanent error so an unexpected RPC shows up as a test failure.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use solen::rpc::{
    AccountInfo, Commitment, KeyedAccount, LatestBlockhash, RpcClient, RpcError, RpcResult,
    SendOptions, SignatureInfo, SignatureStatus, TokenAccountBalance, UiTokenAmount,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landed {
    Finalized,
    Confirmed,
    Failed,
}

/// Signature statuses the test can change between job steps
#[derive(Default)]
pub struct FakeCluster {
    statuses: Mutex<HashMap<String, Landed>>,
    queried: Mutex<Vec<String>>,
    /// Number of status calls still answered with a transient error
    flaky_calls: Mutex<usize>,
}

impl FakeCluster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn land(&self, signature: &str, landed: Landed) {
        self.statuses.lock().insert(signature.to_string(), landed);
    }

    pub fn finalize(&self, signatures: &[&str]) {
        for signature in signatures {
            self.land(signature, Landed::Finalized);
        }
    }

    pub fn fail_next_status_calls(&self, count: usize) {
        *self.flaky_calls.lock() = count;
    }

    /// Every signature passed to `getSignatureStatuses`, in call order
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().clone()
    }

    pub fn clear_queried(&self) {
        self.queried.lock().clear();
    }
}

fn unsupported<T>(method: &str) -> RpcResult<T> {
    Err(RpcError::Malformed(format!("{} is not modelled", method)))
}

#[async_trait]
impl RpcClient for FakeCluster {
    async fn get_latest_blockhash(&self, _: Commitment) -> RpcResult<LatestBlockhash> {
        unsupported("getLatestBlockhash")
    }

    async fn send_transaction(&self, _: &str, _: SendOptions) -> RpcResult<String> {
        unsupported("sendTransaction")
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[String],
        _: bool,
    ) -> RpcResult<Vec<Option<SignatureStatus>>> {
        self.queried.lock().extend(signatures.iter().cloned());
        {
            let mut flaky = self.flaky_calls.lock();
            if *flaky > 0 {
                *flaky -= 1;
                return Err(RpcError::Rpc {
                    code: -32005,
                    message: "Node is behind by 42 slots".to_string(),
                });
            }
        }

        let statuses = self.statuses.lock();
        Ok(signatures
            .iter()
            .map(|signature| {
                statuses.get(signature).map(|landed| SignatureStatus {
                    slot: 100,
                    confirmations: None,
                    err: (*landed == Landed::Failed)
                        .then(|| json!({ "InstructionError": [0, { "Custom": 1 }] })),
                    confirmation_status: Some(match landed {
                        Landed::Confirmed => Commitment::Confirmed,
                        _ => Commitment::Finalized,
                    }),
                })
            })
            .collect())
    }

    async fn get_account_info(&self, _: &str) -> RpcResult<Option<AccountInfo>> {
        unsupported("getAccountInfo")
    }

    async fn get_balance(&self, _: &str) -> RpcResult<u64> {
        unsupported("getBalance")
    }

    async fn get_token_account_balance(&self, _: &str) -> RpcResult<UiTokenAmount> {
        unsupported("getTokenAccountBalance")
    }

    async fn get_token_supply(&self, _: &str) -> RpcResult<UiTokenAmount> {
        unsupported("getTokenSupply")
    }

    async fn get_token_largest_accounts(&self, _: &str) -> RpcResult<Vec<TokenAccountBalance>> {
        unsupported("getTokenLargestAccounts")
    }

    async fn get_token_accounts_by_owner(&self, _: &str, _: &str) -> RpcResult<Vec<KeyedAccount>> {
        unsupported("getTokenAccountsByOwner")
    }

    async fn get_signatures_for_address(
        &self,
        _: &str,
        _: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        unsupported("getSignaturesForAddress")
    }

    async fn get_transaction(&self, _: &str) -> RpcResult<Option<Value>> {
        unsupported("getTransaction")
    }
}
