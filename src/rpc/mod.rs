//! JSON-RPC access to a Solana cluster
//!
//! [`RpcClient`] is the seam the rest of the crate talks to; [`HttpRpcClient`]
//! is the reqwest-backed implementation used by the binary.

mod client;
mod error;
mod http;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use client::RpcClient;
pub use error::{RpcError, RpcResult};
pub use http::{HttpRpcClient, HttpRpcConfig};
pub use types::{
    AccountInfo, Commitment, KeyedAccount, LatestBlockhash, SendOptions, SignatureInfo,
    SignatureStatus, TokenAccountBalance, UiTokenAmount,
};
