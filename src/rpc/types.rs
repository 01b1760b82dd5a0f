//! Wire types for the subset of the Solana JSON-RPC API solen consumes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commitment level, ordered from least to most committed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    #[default]
    Finalized,
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Options for `sendTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: Commitment::Finalized,
        }
    }
}

/// `{ context, value }` envelope used by most account queries
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

/// Result of `getLatestBlockhash`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted
    pub confirmations: Option<u64>,
    /// Transaction error, if the transaction failed on chain
    pub err: Option<Value>,
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Commitment reached by this transaction
    ///
    /// Nodes that predate `confirmationStatus` only report a confirmation
    /// count, which is `null` once rooted.
    pub fn commitment(&self) -> Commitment {
        if let Some(status) = self.confirmation_status {
            return status;
        }
        match self.confirmations {
            None => Commitment::Finalized,
            Some(0) => Commitment::Processed,
            Some(_) => Commitment::Confirmed,
        }
    }
}

/// Account returned by `getAccountInfo` with base64 encoding
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: String,
    /// `[data, encoding]`
    pub data: Vec<String>,
    pub executable: bool,
}

impl AccountInfo {
    /// Decode the base64 account data
    pub fn decode_data(&self) -> crate::utils::error::Result<Vec<u8>> {
        use base64::Engine;
        let encoded = self.data.first().map(String::as_str).unwrap_or_default();
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }
}

/// Token amount as reported by the token program RPC helpers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
    pub ui_amount_string: String,
}

/// Entry of `getTokenLargestAccounts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenAccountBalance {
    pub address: String,
    #[serde(flatten)]
    pub amount: UiTokenAmount,
}

/// Entry of `getTokenAccountsByOwner` with `jsonParsed` encoding
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyedAccount {
    pub pubkey: String,
    pub account: Value,
}

impl KeyedAccount {
    /// Mint of a parsed token account
    pub fn mint(&self) -> Option<&str> {
        self.account
            .pointer("/data/parsed/info/mint")
            .and_then(Value::as_str)
    }

    /// Token amount of a parsed token account
    pub fn token_amount(&self) -> Option<UiTokenAmount> {
        self.account
            .pointer("/data/parsed/info/tokenAmount")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Entry of `getSignaturesForAddress`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    pub err: Option<Value>,
    pub memo: Option<String>,
    pub block_time: Option<i64>,
    pub confirmation_status: Option<Commitment>,
}
