//! init / run / status across job restarts

#[cfg(test)]
mod tests {
    use crate::common::actions::Script;
    use crate::common::cluster::Landed;
    use crate::common::fixtures::{self, ABC_TRANSFERS};
    use crate::common::{FakeCluster, RecordingTransfer};
    use crate::{assert_err, assert_ok};
    use solen::core::bulk::{BulkHandler, BulkSettings, RunOptions};
    use solen::core::confirm::{PollConfig, SignatureConfirmer};
    use solen::utils::error::SolenError;
    use std::time::Duration;
    use tempfile::TempDir;

    // ==================== init ====================

    #[tokio::test]
    async fn test_init_builds_unsent_ledger() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), FakeCluster::new(), dir.path());

        assert_eq!(assert_ok!(job.init(&csv).await), 3);
        assert_eq!(
            job.ledger_path(&csv).unwrap(),
            dir.path().join("devnet_drop.json")
        );

        let ledger = fixtures::load_ledger(&job, &csv).await;
        for (_, row) in ledger.rows() {
            assert!(row.signature.is_empty());
            assert!(row.error.is_empty());
            assert!(!row.finalized);
        }

        let summary = job.status(&csv).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.unsent, 3);
        let amounts = summary.amounts.unwrap();
        assert!((amounts.total - 3.75).abs() < 1e-9);
        assert_eq!(amounts.transferred, 0.0);
    }

    #[tokio::test]
    async fn test_init_twice_keeps_progress() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), FakeCluster::new(), dir.path());

        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();
        let before = std::fs::read(job.ledger_path(&csv).unwrap()).unwrap();

        // Editing the CSV after init must not reset a ledger in flight
        std::fs::write(&csv, "dest,amount\nZ,9\n").unwrap();
        assert_eq!(job.init(&csv).await.unwrap(), 3);

        let after = std::fs::read(job.ledger_path(&csv).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_ledgers_are_scoped_by_env() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let devnet = fixtures::handler(RecordingTransfer::default(), FakeCluster::new(), dir.path());
        devnet.init(&csv).await.unwrap();

        let mainnet = BulkHandler::new(
            RecordingTransfer::default(),
            SignatureConfirmer::new(FakeCluster::new(), PollConfig::new()),
            BulkSettings::new("mainnet", dir.path()),
        )
        .unwrap();
        let err = assert_err!(mainnet.status(&csv).await);
        assert!(matches!(err, SolenError::MissingLedger(_)));
    }

    // ==================== run ====================

    #[tokio::test]
    async fn test_run_then_rerun_submits_each_row_once() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), FakeCluster::new(), dir.path());
        job.init(&csv).await.unwrap();

        let first = job.run(&csv, RunOptions::default()).await.unwrap();
        assert_eq!(first.submitted, 3);
        let second = job.run(&csv, RunOptions::default()).await.unwrap();
        assert_eq!(second.attempted, 0);

        assert_eq!(job.action().calls(), vec!["A", "B", "C"]);
        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert_eq!(ledger.get(1).unwrap().signature, "sig-B");
    }

    #[tokio::test]
    async fn test_interrupted_run_resumes_after_last_flushed_row() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let action = RecordingTransfer::default().with_script("C", Script::Hang);
        let job = fixtures::handler(action, FakeCluster::new(), dir.path());
        job.init(&csv).await.unwrap();

        let interrupted =
            tokio::time::timeout(Duration::from_millis(200), job.run(&csv, RunOptions::default()))
                .await;
        assert!(interrupted.is_err());

        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert_eq!(ledger.get(0).unwrap().signature, "sig-A");
        assert_eq!(ledger.get(1).unwrap().signature, "sig-B");
        assert!(!ledger.get(2).unwrap().is_sent());

        job.action().clear_script("C");
        let report = job.run(&csv, RunOptions::default()).await.unwrap();
        assert_eq!(report.submitted, 1);
        assert_eq!(job.action().calls(), vec!["A", "B", "C", "C"]);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_by_next_run() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let action = RecordingTransfer::default().with_script("B", Script::Transient);
        let job = fixtures::handler(action, FakeCluster::new(), dir.path());
        job.init(&csv).await.unwrap();

        let report = job.run(&csv, RunOptions::default()).await.unwrap();
        assert_eq!((report.submitted, report.failed), (2, 1));

        let ledger = fixtures::load_ledger(&job, &csv).await;
        let row = ledger.get(1).unwrap();
        assert!(row.error.contains("Node is behind"));
        assert!(row.signature.is_empty());
        assert!(ledger.get(2).unwrap().is_sent());

        job.action().clear_script("B");
        job.run(&csv, RunOptions::default()).await.unwrap();
        let ledger = fixtures::load_ledger(&job, &csv).await;
        let row = ledger.get(1).unwrap();
        assert_eq!(row.signature, "sig-B");
        assert!(row.error.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_row_counts_as_failed() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let action = RecordingTransfer::default().with_script("A", Script::Rejected);
        let job = fixtures::handler(action, FakeCluster::new(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        let summary = job.status(&csv).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.unsent, 1);
        assert_eq!(summary.unfinalized, 2);
    }

    #[tokio::test]
    async fn test_dry_run_calls_action_without_touching_ledger() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), FakeCluster::new(), dir.path());
        job.init(&csv).await.unwrap();
        let before = std::fs::read(job.ledger_path(&csv).unwrap()).unwrap();

        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = job.run(&csv, options).await.unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.submitted, 0);
        assert_eq!(job.action().calls().len(), 3);

        let after = std::fs::read(job.ledger_path(&csv).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_ignore_unfinalized_resubmits_only_lost_transactions() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        // A landed late; B and C were dropped by the cluster
        cluster.finalize(&["sig-A"]);
        let options = RunOptions {
            ignore_unfinalized_signature: true,
            ..Default::default()
        };
        let report = job.run(&csv, options).await.unwrap();
        assert_eq!(report.already_finalized, 1);
        assert_eq!(report.submitted, 2);
        assert_eq!(job.action().calls(), vec!["A", "B", "C", "B", "C"]);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert!(ledger.get(0).unwrap().finalized);
    }

    fn recheck_options() -> RunOptions {
        RunOptions {
            ignore_unfinalized_signature: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ignore_unfinalized_skips_landed_transactions() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        // A is confirmed but not finalized yet
        cluster.land("sig-A", Landed::Confirmed);
        let report = job.run(&csv, recheck_options()).await.unwrap();
        assert_eq!(report.undecided, 1);
        assert_eq!(report.submitted, 2);
        assert_eq!(job.action().calls(), vec!["A", "B", "C", "B", "C"]);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        let row = ledger.get(0).unwrap();
        assert_eq!(row.signature, "sig-A");
        assert!(!row.finalized);
    }

    #[tokio::test]
    async fn test_ignore_unfinalized_skips_rows_it_cannot_check() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        // A is finalized, but the node is lagging when A is rechecked
        cluster.finalize(&["sig-A", "sig-B", "sig-C"]);
        cluster.fail_next_status_calls(1);
        let report = job.run(&csv, recheck_options()).await.unwrap();
        assert_eq!(report.undecided, 1);
        assert_eq!(report.already_finalized, 2);
        assert_eq!(report.attempted, 0);
        assert_eq!(job.action().calls(), vec!["A", "B", "C"]);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert!(!ledger.get(0).unwrap().finalized);
        assert_eq!(job.confirm(&csv).await.unwrap().total_finalized, 3);
    }

    #[tokio::test]
    async fn test_ignore_unfinalized_resubmits_failed_transactions() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        cluster.land("sig-A", Landed::Failed);
        cluster.finalize(&["sig-B", "sig-C"]);
        let report = job.run(&csv, recheck_options()).await.unwrap();
        assert_eq!(report.already_finalized, 2);
        assert_eq!(report.submitted, 1);
        assert_eq!(report.undecided, 0);
        assert_eq!(job.action().calls(), vec!["A", "B", "C", "A"]);
    }
}
