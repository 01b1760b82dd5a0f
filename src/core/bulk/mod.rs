//! Resumable bulk jobs
//!
//! A CSV file becomes a JSON ledger with one row per input line. `run`
//! submits unsent rows one at a time and flushes the ledger after each,
//! `confirm` polls the signatures of unfinalized rows concurrently, and
//! `status` aggregates the ledger. Re-running any step resumes where the
//! ledger left off.

mod action;
mod handler;
mod ingest;
mod ledger;
mod request;
mod summary;

pub use action::{BulkAction, SubmitOptions};
pub use handler::{BulkHandler, BulkSettings, ConfirmReport, RunOptions, RunReport};
pub use ingest::{ColumnSchema, read_rows, validate_csv_path};
pub use ledger::{BulkLedger, WorkItem};
pub use request::{BulkRequest, CreatorSpec, MetadataUpdate, MetadataUpdateRequest, TransferRequest};
pub use summary::{AmountSummary, BulkSummary};
