//! init / run / confirm / status over a bulk ledger

use super::action::{BulkAction, SubmitOptions};
use super::ingest::{read_rows, validate_csv_path};
use super::ledger::{BulkLedger, WorkItem};
use super::request::BulkRequest;
use super::summary::BulkSummary;
use crate::core::batch::{BatchConfig, BatchRunner};
use crate::core::confirm::{ConfirmOutcome, SignatureConfirmer};
use crate::utils::error::{Result, SolenError};
use crate::utils::{expand_home, format_amount, format_elapsed};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Where ledgers live and how the job paces itself
#[derive(Debug, Clone)]
pub struct BulkSettings {
    /// Cluster name, part of every ledger file name
    pub env: String,
    pub data_folder: PathBuf,
    /// Pause after a transient remote failure in `run` (default: 1s)
    pub transient_backoff: Duration,
    /// Fan-out used by `confirm`
    pub batch: BatchConfig,
}

impl BulkSettings {
    pub fn new(env: impl Into<String>, data_folder: impl Into<PathBuf>) -> Self {
        Self {
            env: env.into(),
            data_folder: data_folder.into(),
            transient_backoff: Duration::from_secs(1),
            batch: BatchConfig::default(),
        }
    }

    pub fn with_transient_backoff(mut self, backoff: Duration) -> Self {
        self.transient_backoff = backoff;
        self
    }

    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }
}

/// Flags for [`BulkHandler::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub skip_confirm: bool,
    /// Also revisit rows that have a signature but never finalized. Each is
    /// checked once more and resubmitted only if still unconfirmed.
    pub ignore_unfinalized_signature: bool,
}

/// What a `run` pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows the action was invoked for
    pub attempted: usize,
    pub submitted: usize,
    pub failed: usize,
    /// Rows found finalized on recheck instead of being resubmitted
    pub already_finalized: usize,
    /// Rows left alone because their previous signature may still land
    pub undecided: usize,
    pub elapsed: Duration,
}

/// What a `confirm` pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmReport {
    pub polled: usize,
    pub newly_finalized: usize,
    pub total_finalized: usize,
    pub total: usize,
}

/// Drives one job type through its ledger
pub struct BulkHandler<A: BulkAction> {
    action: A,
    confirmer: SignatureConfirmer,
    runner: BatchRunner,
    settings: BulkSettings,
}

impl<A: BulkAction> BulkHandler<A> {
    pub fn new(action: A, confirmer: SignatureConfirmer, settings: BulkSettings) -> Result<Self> {
        if settings.env.is_empty() {
            return Err(SolenError::invalid_input("missing environment name"));
        }
        Ok(Self {
            action,
            confirmer,
            runner: BatchRunner::new(settings.batch.clone()),
            settings,
        })
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn settings(&self) -> &BulkSettings {
        &self.settings
    }

    /// Ledger file backing `csv_path` in this environment
    pub fn ledger_path(&self, csv_path: impl AsRef<Path>) -> Result<PathBuf> {
        BulkLedger::path_for(
            &self.settings.data_folder,
            &self.settings.env,
            &expand_home(csv_path),
        )
    }

    /// Create the ledger from the CSV, or load it if it already exists.
    /// Returns the number of rows.
    pub async fn init(&self, csv_path: impl AsRef<Path>) -> Result<usize> {
        let csv_path = expand_home(csv_path);
        validate_csv_path(&csv_path)?;
        let ledger_path = self.ledger_path(&csv_path)?;

        if BulkLedger::exists(&ledger_path).await? {
            info!("Ledger already exists: {}", ledger_path.display());
            let ledger = BulkLedger::load(&ledger_path).await?;
            self.log_summary(&ledger);
            return Ok(ledger.len());
        }

        info!(
            "Creating {} ledger from {}",
            self.action.name(),
            csv_path.display()
        );
        let rows = read_rows(&csv_path, A::Request::schema())?;
        for (i, fields) in rows.iter().enumerate() {
            A::Request::from_fields(fields).map_err(|e| {
                SolenError::invalid_input(format!("row {}: {}", i, e))
            })?;
        }

        let ledger = BulkLedger::new(ledger_path, rows.into_iter().map(WorkItem::new).collect());
        ledger.save().await?;
        info!("Ledger created: {}", ledger.path().display());
        self.log_summary(&ledger);
        Ok(ledger.len())
    }

    /// Submit every pending row once, in ledger order, flushing the ledger
    /// after each row. Per-row failures are recorded, never raised.
    ///
    /// With `ignore_unfinalized_signature`, a sent row is resubmitted only
    /// when its previous signature failed on chain or was never seen by the
    /// node. A row whose signature landed, or could not be checked, is left
    /// for `confirm`.
    pub async fn run(&self, csv_path: impl AsRef<Path>, options: RunOptions) -> Result<RunReport> {
        let started = Instant::now();
        let csv_path = expand_home(csv_path);
        validate_csv_path(&csv_path)?;
        let mut ledger = BulkLedger::load(self.ledger_path(&csv_path)?).await?;

        let pending = ledger.pending(options.ignore_unfinalized_signature);
        info!(
            "Going to handle {} out of {} {} rows (dry run: {})",
            pending.len(),
            ledger.len(),
            self.action.name(),
            options.dry_run
        );

        let submit_options = SubmitOptions {
            dry_run: options.dry_run,
            skip_confirm: options.skip_confirm,
        };
        let mut report = RunReport::default();

        for (counter, &index) in pending.iter().enumerate() {
            let Some(item) = ledger.get(index).cloned() else {
                continue;
            };
            info!(
                row = index,
                "[{}] handle {} {}/{}",
                format_elapsed(started.elapsed()),
                self.action.name(),
                counter + 1,
                pending.len()
            );

            if item.is_sent() && !options.dry_run {
                match self.confirmer.confirm(&item.signature).await.outcome {
                    ConfirmOutcome::Reached(_) => {
                        info!(row = index, "Previous signature is finalized, skipping");
                        ledger.mark_finalized(index);
                        ledger.save().await?;
                        report.already_finalized += 1;
                        continue;
                    }
                    ConfirmOutcome::Exhausted { last_seen: Some(seen) } => {
                        warn!(
                            row = index,
                            "Previous signature {} reached {} and may still finalize, skipping",
                            item.signature,
                            seen
                        );
                        report.undecided += 1;
                        continue;
                    }
                    ConfirmOutcome::RemoteError(e) => {
                        warn!(
                            row = index,
                            "Unable to recheck previous signature {}, skipping: {}", item.signature, e
                        );
                        report.undecided += 1;
                        continue;
                    }
                    ConfirmOutcome::TransactionFailed(e) => warn!(
                        row = index,
                        "Previous signature {} failed on chain ({}), resubmitting", item.signature, e
                    ),
                    ConfirmOutcome::Exhausted { last_seen: None } => warn!(
                        row = index,
                        "Previous signature {} never landed, resubmitting", item.signature
                    ),
                }
            }

            let request = match A::Request::from_fields(&item.fields) {
                Ok(request) => request,
                Err(e) => {
                    warn!(row = index, "Skipping malformed row: {}", e);
                    if !options.dry_run {
                        if let Some(row) = ledger.get_mut(index) {
                            row.error = e.to_string();
                        }
                        ledger.save().await?;
                        report.failed += 1;
                    }
                    continue;
                }
            };

            report.attempted += 1;
            let attempt_started = Instant::now();
            let outcome = self.action.submit(&request, submit_options).await;
            let elapsed = format_elapsed(attempt_started.elapsed());

            if options.dry_run {
                match outcome {
                    Ok(_) => info!(row = index, "Dry run ok"),
                    Err(e) => warn!(row = index, "Dry run failed: {}", e),
                }
                continue;
            }

            let transient = match &outcome {
                Err(e) => e.is_transient(),
                Ok(_) => false,
            };
            if let Some(row) = ledger.get_mut(index) {
                match outcome {
                    Ok(signature) => {
                        row.signature = signature;
                        row.error.clear();
                        row.finalized = false;
                        report.submitted += 1;
                    }
                    Err(e) => {
                        warn!(row = index, category = e.category(), "{} failed: {}", self.action.name(), e);
                        row.error = e.to_string();
                        report.failed += 1;
                    }
                }
                row.time = Some(elapsed);
            }
            ledger.save().await?;

            if transient {
                // Hammering a lagging node only produces more failures
                tokio::time::sleep(self.settings.transient_backoff).await;
            }
        }

        report.elapsed = started.elapsed();
        info!(
            "Bulk run completed after {} (submitted: {}, failed: {}, undecided: {})",
            format_elapsed(report.elapsed),
            report.submitted,
            report.failed,
            report.undecided
        );
        Ok(report)
    }

    /// Poll every sent, unfinalized row concurrently and persist the results
    /// once the whole batch has drained
    pub async fn confirm(&self, csv_path: impl AsRef<Path>) -> Result<ConfirmReport> {
        let started = Instant::now();
        let mut ledger = BulkLedger::load(self.ledger_path(csv_path)?).await?;

        let targets = ledger.unfinalized();
        info!(
            "Going to confirm {} unfinalized rows out of {}",
            targets.len(),
            ledger.len()
        );
        let mut report = ConfirmReport {
            polled: targets.len(),
            total: ledger.len(),
            ..Default::default()
        };
        if targets.is_empty() {
            report.total_finalized = ledger.finalized_count();
            info!("Nothing to confirm");
            return Ok(report);
        }

        let confirmer = &self.confirmer;
        let results = self
            .runner
            .run_all(targets.clone(), move |(index, signature)| async move {
                Ok::<_, SolenError>(confirmer.confirm_tagged(&signature, index).await)
            })
            .await;

        for item in results {
            match item.result {
                Ok(result) => {
                    if let (true, Some(index)) = (result.confirmed, result.tag) {
                        if ledger.mark_finalized(index) {
                            report.newly_finalized += 1;
                        }
                    }
                }
                Err(e) => {
                    let row = targets.get(item.index).map(|(row, _)| *row);
                    warn!(row, "Confirmation failed: {}", e);
                }
            }
        }

        ledger.save().await?;
        report.total_finalized = ledger.finalized_count();
        info!(
            "Done after {}. total finalized: {} / {}",
            format_elapsed(started.elapsed()),
            report.total_finalized,
            report.total
        );
        Ok(report)
    }

    /// Aggregate counts over the ledger
    pub async fn status(&self, csv_path: impl AsRef<Path>) -> Result<BulkSummary> {
        let ledger = BulkLedger::load(self.ledger_path(csv_path)?).await?;
        Ok(BulkSummary::from_ledger::<A::Request>(&ledger))
    }

    fn log_summary(&self, ledger: &BulkLedger) {
        let summary = BulkSummary::from_ledger::<A::Request>(ledger);
        match summary.amounts {
            Some(amounts) => info!(
                "Total records: {}, left records: {}, total amount: {}, left amount: {}",
                summary.total,
                summary.unsent,
                format_amount(amounts.total, 4),
                format_amount(amounts.outstanding, 4)
            ),
            None => info!(
                "Total records: {}, left records: {}",
                summary.total, summary.unsent
            ),
        }
    }
}
