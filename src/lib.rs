//! # solen
//!
//! Solana token and NFT toolkit built around a resumable bulk engine.
//!
//! ## Features
//!
//! - **Token transfers**: SPL transfers that create the recipient's associated account on demand
//! - **NFT metadata**: read, update and verify token metadata accounts
//! - **Bulk jobs**: CSV input becomes a durable JSON ledger; `run`, `confirm` and `status`
//!   resume from it after any interruption
//! - **Rate limited confirmation**: signatures are polled concurrently under a sliding window
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use solen::{Config, client::{Context, TokenClient}, core::bulk::RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let context = Context::from_config(&config, Some("dev"))?;
//!     let job = TokenClient::new(context, None).await?.bulk_transfer()?;
//!
//!     let csv = std::path::Path::new("dev_drop.csv");
//!     job.init(csv).await?;
//!     job.run(csv, RunOptions::default()).await?;
//!     job.confirm(csv).await?;
//!     println!("{:?}", job.status(csv).await?);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod rpc;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, SolenError};

pub use client::{Context, NftClient, SolClient, TokenClient};
pub use core::bulk::{BulkAction, BulkHandler, BulkLedger, BulkSummary, RunOptions, WorkItem};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information reported by `solen version`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            git_hash: env!("SOLEN_GIT_HASH"),
            rust_version: env!("SOLEN_RUST_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            NAME, self.version, self.git_hash, self.rust_version
        )
    }
}

/// Build information for this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
