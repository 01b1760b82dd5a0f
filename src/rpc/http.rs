//! reqwest-backed JSON-RPC 2.0 client

use super::client::RpcClient;
use super::error::{RpcError, RpcResult};
use super::types::{
    AccountInfo, Commitment, KeyedAccount, LatestBlockhash, SendOptions, SignatureInfo,
    SignatureStatus, TokenAccountBalance, UiTokenAmount, WithContext,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for [`HttpRpcClient`]
#[derive(Debug, Clone)]
pub struct HttpRpcConfig {
    /// Cluster RPC endpoint
    pub url: String,
    /// Per-request timeout (default: 30s)
    pub timeout: Duration,
}

impl HttpRpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client over HTTP
pub struct HttpRpcClient {
    http_client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(config: HttpRpcConfig) -> RpcResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: config.url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "Sending RPC request");

        let response = self.http_client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        // Some providers pair JSON-RPC errors with a non-200 status
        let envelope = match serde_json::from_str::<RpcEnvelope>(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Http {
                    status: status.as_u16(),
                    body: text,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(error) = envelope.error {
            warn!(method, code = error.code, "RPC error: {}", error.message);
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| RpcError::Malformed(format!("{}: {}", method, e)))
    }

    async fn call_with_context<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> RpcResult<T> {
        let wrapped: WithContext<T> = self.call(method, params).await?;
        Ok(wrapped.value)
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn get_latest_blockhash(&self, commitment: Commitment) -> RpcResult<LatestBlockhash> {
        self.call_with_context("getLatestBlockhash", json!([{ "commitment": commitment }]))
            .await
    }

    async fn send_transaction(
        &self,
        transaction: &str,
        options: SendOptions,
    ) -> RpcResult<String> {
        self.call(
            "sendTransaction",
            json!([
                transaction,
                {
                    "encoding": "base64",
                    "skipPreflight": options.skip_preflight,
                    "preflightCommitment": options.preflight_commitment,
                }
            ]),
        )
        .await
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[String],
        search_transaction_history: bool,
    ) -> RpcResult<Vec<Option<SignatureStatus>>> {
        self.call_with_context(
            "getSignatureStatuses",
            json!([signatures, { "searchTransactionHistory": search_transaction_history }]),
        )
        .await
    }

    async fn get_account_info(&self, address: &str) -> RpcResult<Option<AccountInfo>> {
        self.call_with_context("getAccountInfo", json!([address, { "encoding": "base64" }]))
            .await
    }

    async fn get_balance(&self, address: &str) -> RpcResult<u64> {
        self.call_with_context("getBalance", json!([address])).await
    }

    async fn get_token_account_balance(&self, address: &str) -> RpcResult<UiTokenAmount> {
        self.call_with_context("getTokenAccountBalance", json!([address]))
            .await
    }

    async fn get_token_supply(&self, mint: &str) -> RpcResult<UiTokenAmount> {
        self.call_with_context("getTokenSupply", json!([mint])).await
    }

    async fn get_token_largest_accounts(
        &self,
        mint: &str,
    ) -> RpcResult<Vec<TokenAccountBalance>> {
        self.call_with_context("getTokenLargestAccounts", json!([mint]))
            .await
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> RpcResult<Vec<KeyedAccount>> {
        self.call_with_context(
            "getTokenAccountsByOwner",
            json!([owner, { "programId": program_id }, { "encoding": "jsonParsed" }]),
        )
        .await
    }

    async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        let params = match limit {
            Some(limit) => json!([address, { "limit": limit }]),
            None => json!([address]),
        };
        self.call("getSignaturesForAddress", params).await
    }

    async fn get_transaction(&self, signature: &str) -> RpcResult<Option<Value>> {
        self.call(
            "getTransaction",
            json!([signature, { "encoding": "json", "maxSupportedTransactionVersion": 0 }]),
        )
        .await
    }
}
