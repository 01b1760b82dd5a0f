//! The per-row operation a bulk job drives

use super::request::BulkRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Flags passed to every submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Build and validate, but do not send anything
    pub dry_run: bool,
    /// Return as soon as the transaction is accepted, without waiting for
    /// confirmation
    pub skip_confirm: bool,
}

/// A write operation invoked once per unsent ledger row
#[async_trait]
pub trait BulkAction: Send + Sync {
    type Request: BulkRequest;

    /// Human readable name used in logs, e.g. "transfer"
    fn name(&self) -> &'static str;

    /// Submit one request and return its transaction signature.
    ///
    /// In dry-run mode implementations must not send anything; whatever they
    /// return is discarded by the caller.
    async fn submit(&self, request: &Self::Request, options: SubmitOptions) -> Result<String>;
}
