//! RPC error type and transient classification

use thiserror::Error;

/// Result type alias for RPC calls
pub type RpcResult<T> = std::result::Result<T, RpcError>;

/// Node is unhealthy, typically "Node is behind by N slots"
pub const NODE_UNHEALTHY: i64 = -32005;
/// Block not available for slot
pub const BLOCK_NOT_AVAILABLE: i64 = -32004;
/// Slot was skipped or is missing in long-term storage
pub const SLOT_SKIPPED: i64 = -32007;
pub const LONG_TERM_STORAGE_SLOT_SKIPPED: i64 = -32009;

/// Errors returned by an [`RpcClient`](super::RpcClient)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS or request timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// Whether the same request may succeed if retried shortly
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Rpc { code, message } => {
                matches!(
                    *code,
                    NODE_UNHEALTHY | BLOCK_NOT_AVAILABLE | SLOT_SKIPPED | LONG_TERM_STORAGE_SLOT_SKIPPED
                ) || message.contains("Node is behind by")
            }
            RpcError::Http { status, .. } => *status == 429 || *status >= 500,
            RpcError::Transport(_) => true,
            RpcError::Malformed(_) => false,
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RpcError::Malformed(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Malformed(err.to_string())
    }
}
