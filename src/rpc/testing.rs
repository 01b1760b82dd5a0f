//! In-memory [`RpcClient`] shared by the unit tests

use super::client::RpcClient;
use super::error::{RpcError, RpcResult};
use super::types::{
    AccountInfo, Commitment, KeyedAccount, LatestBlockhash, SendOptions, SignatureInfo,
    SignatureStatus, TokenAccountBalance, UiTokenAmount,
};
use async_trait::async_trait;
use base58::ToBase58;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) type StatusReply = RpcResult<Vec<Option<SignatureStatus>>>;

const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// A finalized status without an error
pub(crate) fn finalized_status() -> SignatureStatus {
    SignatureStatus {
        slot: 1,
        confirmations: None,
        err: None,
        confirmation_status: Some(Commitment::Finalized),
    }
}

/// In-memory cluster.
///
/// Status lookups replay `status_replies` first. Once those run out each
/// signature gets its entry in `statuses`, or `status_of_unknown`. Sends fail
/// with the queued `send_failures` before any is accepted.
pub(crate) struct FakeRpc {
    pub accounts: Mutex<HashMap<String, AccountInfo>>,
    pub lamports: u64,
    pub decimals: u8,
    pub largest: Vec<String>,
    pub owned: Vec<KeyedAccount>,
    pub history: Vec<SignatureInfo>,
    pub transaction: Option<Value>,
    pub send_failures: Mutex<VecDeque<RpcError>>,
    pub status_replies: Mutex<VecDeque<StatusReply>>,
    pub statuses: Mutex<HashMap<String, SignatureStatus>>,
    pub status_of_unknown: Option<SignatureStatus>,
    pub sent: Mutex<Vec<Vec<u8>>>,
    pub queried: Mutex<Vec<String>>,
    pub status_calls: AtomicUsize,
}

impl Default for FakeRpc {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            lamports: 1_500_000_000,
            decimals: 6,
            largest: Vec::new(),
            owned: Vec::new(),
            history: vec![SignatureInfo {
                signature: "sig1".to_string(),
                slot: 10,
                err: None,
                memo: None,
                block_time: Some(1_641_486_108),
                confirmation_status: Some(Commitment::Finalized),
            }],
            transaction: None,
            send_failures: Mutex::new(VecDeque::new()),
            status_replies: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(HashMap::new()),
            status_of_unknown: None,
            sent: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeRpc {
    /// Reports `finalized` as finalized and every other signature as unknown
    pub fn with_finalized(finalized: &[&str]) -> Arc<Self> {
        let rpc = Self::default();
        rpc.statuses.lock().extend(
            finalized
                .iter()
                .map(|sig| (sig.to_string(), finalized_status())),
        );
        Arc::new(rpc)
    }

    pub fn with_status_replies(replies: Vec<StatusReply>) -> Arc<Self> {
        let rpc = Self::default();
        *rpc.status_replies.lock() = replies.into();
        Arc::new(rpc)
    }

    pub fn add_account(&self, address: impl ToString, owner: impl ToString, data: &[u8]) {
        self.accounts.lock().insert(
            address.to_string(),
            AccountInfo {
                lamports: 2_039_280,
                owner: owner.to_string(),
                data: vec![B64.encode(data), "base64".to_string()],
                executable: false,
            },
        );
    }

    /// Raw bytes of every accepted transaction
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    /// Distinct signatures looked up so far, sorted
    pub fn queried(&self) -> Vec<String> {
        let mut queried = self.queried.lock().clone();
        queried.sort();
        queried.dedup();
        queried
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcClient for FakeRpc {
    async fn get_latest_blockhash(&self, _: Commitment) -> RpcResult<LatestBlockhash> {
        Ok(LatestBlockhash {
            blockhash: [7u8; 32].to_base58(),
            last_valid_block_height: 100,
        })
    }

    async fn send_transaction(&self, transaction: &str, _: SendOptions) -> RpcResult<String> {
        if let Some(err) = self.send_failures.lock().pop_front() {
            return Err(err);
        }
        let bytes = B64
            .decode(transaction)
            .map_err(|e| RpcError::Malformed(e.to_string()))?;
        let signature = bytes
            .get(1..65)
            .ok_or_else(|| RpcError::Malformed("transaction too short".to_string()))?
            .to_base58();
        self.sent.lock().push(bytes);
        Ok(signature)
    }

    async fn get_signature_statuses(&self, signatures: &[String], _: bool) -> StatusReply {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.queried.lock().extend(signatures.iter().cloned());
        if let Some(reply) = self.status_replies.lock().pop_front() {
            return reply;
        }
        let statuses = self.statuses.lock();
        Ok(signatures
            .iter()
            .map(|sig| {
                statuses
                    .get(sig)
                    .or(self.status_of_unknown.as_ref())
                    .cloned()
            })
            .collect())
    }

    async fn get_account_info(&self, address: &str) -> RpcResult<Option<AccountInfo>> {
        Ok(self.accounts.lock().get(address).cloned())
    }

    async fn get_balance(&self, _: &str) -> RpcResult<u64> {
        Ok(self.lamports)
    }

    async fn get_token_account_balance(&self, _: &str) -> RpcResult<UiTokenAmount> {
        Ok(UiTokenAmount {
            amount: "12500000".to_string(),
            decimals: self.decimals,
            ui_amount: Some(12.5),
            ui_amount_string: "12.5".to_string(),
        })
    }

    async fn get_token_supply(&self, _: &str) -> RpcResult<UiTokenAmount> {
        Ok(UiTokenAmount {
            amount: "1000000000".to_string(),
            decimals: self.decimals,
            ui_amount: Some(1000.0),
            ui_amount_string: "1000".to_string(),
        })
    }

    async fn get_token_largest_accounts(&self, _: &str) -> RpcResult<Vec<TokenAccountBalance>> {
        Ok(self
            .largest
            .iter()
            .map(|address| TokenAccountBalance {
                address: address.clone(),
                amount: UiTokenAmount {
                    amount: "1".to_string(),
                    decimals: 0,
                    ui_amount: Some(1.0),
                    ui_amount_string: "1".to_string(),
                },
            })
            .collect())
    }

    async fn get_token_accounts_by_owner(&self, _: &str, _: &str) -> RpcResult<Vec<KeyedAccount>> {
        Ok(self.owned.clone())
    }

    async fn get_signatures_for_address(
        &self,
        _: &str,
        limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        let limit = limit.unwrap_or(self.history.len());
        Ok(self.history.iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, _: &str) -> RpcResult<Option<Value>> {
        Ok(self.transaction.clone())
    }
}
