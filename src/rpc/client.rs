//! The RPC client trait

use super::error::RpcResult;
use super::types::{
    AccountInfo, Commitment, KeyedAccount, LatestBlockhash, SendOptions, SignatureInfo,
    SignatureStatus, TokenAccountBalance, UiTokenAmount,
};
use async_trait::async_trait;
use serde_json::Value;

/// Remote ledger operations consumed by solen
#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn get_latest_blockhash(&self, commitment: Commitment) -> RpcResult<LatestBlockhash>;

    /// Submit a base64 encoded, signed transaction and return its signature
    async fn send_transaction(&self, transaction: &str, options: SendOptions)
    -> RpcResult<String>;

    /// One entry per requested signature, `None` when the node has not seen it
    async fn get_signature_statuses(
        &self,
        signatures: &[String],
        search_transaction_history: bool,
    ) -> RpcResult<Vec<Option<SignatureStatus>>>;

    async fn get_account_info(&self, address: &str) -> RpcResult<Option<AccountInfo>>;

    /// Balance in lamports
    async fn get_balance(&self, address: &str) -> RpcResult<u64>;

    async fn get_token_account_balance(&self, address: &str) -> RpcResult<UiTokenAmount>;

    async fn get_token_supply(&self, mint: &str) -> RpcResult<UiTokenAmount>;

    async fn get_token_largest_accounts(&self, mint: &str) -> RpcResult<Vec<TokenAccountBalance>>;

    async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> RpcResult<Vec<KeyedAccount>>;

    async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>>;

    async fn get_transaction(&self, signature: &str) -> RpcResult<Option<Value>>;
}
