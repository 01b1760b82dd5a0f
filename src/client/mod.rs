//! High level clients
//!
//! [`TokenClient`], [`NftClient`] and [`SolClient`] wrap a [`Context`] (one
//! cluster, one wallet) and expose the operations the CLI offers. Writes go
//! through [`SignedOperation`]; the token and NFT clients double as the
//! per-row actions of the bulk jobs.

mod context;
mod nft;
mod operation;
mod retry;
mod sol;
mod token;

pub use context::Context;
pub use nft::{BulkUpdate, NftAccount, NftClient};
pub use operation::SignedOperation;
pub use sol::SolClient;
pub use token::{BulkTransfer, DRY_RUN_SIGNATURE, TokenClient};
