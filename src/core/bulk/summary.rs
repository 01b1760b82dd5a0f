//! Aggregate view of a ledger

use super::ledger::BulkLedger;
use super::request::BulkRequest;
use serde::Serialize;
use std::path::PathBuf;

/// Amount totals for jobs that move value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmountSummary {
    pub total: f64,
    /// Sum over rows with a signature (submitted, not necessarily finalized)
    pub transferred: f64,
    pub outstanding: f64,
}

impl AmountSummary {
    pub const ZERO: Self = Self {
        total: 0.0,
        transferred: 0.0,
        outstanding: 0.0,
    };
}

/// Counts over all rows of a ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkSummary {
    pub ledger_path: PathBuf,
    pub total: usize,
    /// No signature yet
    pub unsent: usize,
    /// Signature but not finalized
    pub unfinalized: usize,
    pub finalized: usize,
    /// No signature and the last attempt failed
    pub failed: usize,
    pub amounts: Option<AmountSummary>,
}

impl BulkSummary {
    pub fn from_ledger<R: BulkRequest>(ledger: &BulkLedger) -> Self {
        let mut summary = Self {
            ledger_path: ledger.path().to_path_buf(),
            total: ledger.len(),
            unsent: 0,
            unfinalized: 0,
            finalized: 0,
            failed: 0,
            amounts: None,
        };
        let mut amounts = R::MOVES_VALUE.then_some(AmountSummary::ZERO);

        for (_, item) in ledger.rows() {
            if !item.is_sent() {
                summary.unsent += 1;
            } else if !item.finalized {
                summary.unfinalized += 1;
            }
            if item.finalized {
                summary.finalized += 1;
            }
            if item.is_failed() {
                summary.failed += 1;
            }

            let Some(amount) = R::from_fields(&item.fields).ok().and_then(|r| r.amount()) else {
                continue;
            };
            let totals = amounts.get_or_insert(AmountSummary::ZERO);
            totals.total += amount;
            if item.is_sent() {
                totals.transferred += amount;
            } else {
                totals.outstanding += amount;
            }
        }

        summary.amounts = amounts;
        summary
    }
}
