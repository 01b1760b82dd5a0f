//! confirm and status over ledgers in every state

#[cfg(test)]
mod tests {
    use crate::common::actions::Script;
    use crate::common::cluster::Landed;
    use crate::common::fixtures::{self, ABC_TRANSFERS};
    use crate::common::{FakeCluster, RecordingTransfer};
    use solen::core::batch::BatchConfig;
    use solen::core::bulk::RunOptions;
    use solen::core::rate_limiter::RateLimitRule;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_confirm_polls_only_unfinalized_rows() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        // C is never sent
        let action = RecordingTransfer::default().with_script("C", Script::Rejected);
        let job = fixtures::handler(action, cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        cluster.finalize(&["sig-A"]);
        job.confirm(&csv).await.unwrap();
        cluster.clear_queried();

        cluster.finalize(&["sig-B"]);
        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.polled, 1);
        assert_eq!(report.newly_finalized, 1);
        assert_eq!(report.total_finalized, 2);
        assert_eq!(cluster.queried(), vec!["sig-B"]);

        let summary = job.status(&csv).await.unwrap();
        assert_eq!(summary.finalized, 2);
        assert_eq!(summary.unsent, 1);
    }

    #[tokio::test]
    async fn test_confirm_never_revokes_finality() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        cluster.finalize(&["sig-A", "sig-B", "sig-C"]);
        assert_eq!(job.confirm(&csv).await.unwrap().total_finalized, 3);

        // Later status changes on the node are ignored
        cluster.land("sig-A", Landed::Failed);
        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.polled, 0);
        assert_eq!(report.total_finalized, 3);
    }

    #[tokio::test]
    async fn test_confirm_leaves_failed_and_pending_rows_unfinalized() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        cluster.land("sig-A", Landed::Finalized);
        cluster.land("sig-B", Landed::Confirmed);
        cluster.land("sig-C", Landed::Failed);
        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.newly_finalized, 1);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert!(ledger.get(0).unwrap().finalized);
        assert!(!ledger.get(1).unwrap().finalized);
        assert!(!ledger.get(2).unwrap().finalized);
    }

    #[tokio::test]
    async fn test_confirm_after_remote_errors_is_safe_to_rerun() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let cluster = FakeCluster::new();
        let job = fixtures::handler(RecordingTransfer::default(), cluster.clone(), dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        cluster.finalize(&["sig-A", "sig-B", "sig-C"]);
        cluster.fail_next_status_calls(3);
        let first = job.confirm(&csv).await.unwrap();
        assert_eq!(first.newly_finalized, 0);

        let second = job.confirm(&csv).await.unwrap();
        assert_eq!(second.newly_finalized, 3);
        assert_eq!(second.total_finalized, 3);
    }

    #[tokio::test]
    async fn test_concurrent_confirm_matches_results_to_rows() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "many.csv", &fixtures::many_transfers(60));
        let cluster = FakeCluster::new();
        let batch = BatchConfig::new()
            .with_concurrency(16)
            .with_rate_limits(vec![]);
        let job =
            fixtures::handler_with(RecordingTransfer::default(), cluster.clone(), dir.path(), batch);
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        // Every third row lands; the rest stay unknown to the node
        for i in (0..60).step_by(3) {
            cluster.land(&format!("sig-W{}", i), Landed::Finalized);
        }
        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.newly_finalized, 20);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        for (index, row) in ledger.rows() {
            assert_eq!(row.finalized, index % 3 == 0, "row {}", index);
            assert_eq!(row.field("dest"), Some(format!("W{}", index).as_str()));
        }
    }

    #[tokio::test]
    async fn test_confirm_respects_rate_limit() {
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "many.csv", &fixtures::many_transfers(12));
        let cluster = FakeCluster::new();
        let batch = BatchConfig::new()
            .with_concurrency(12)
            .with_rate_limits(vec![RateLimitRule::new(5, Duration::from_millis(100))]);
        let job =
            fixtures::handler_with(RecordingTransfer::default(), cluster.clone(), dir.path(), batch);
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        let names: Vec<String> = (0..12).map(|i| format!("sig-W{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        cluster.finalize(&names);

        let started = Instant::now();
        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.newly_finalized, 12);
        // 12 polls at 5 per 100ms need at least two full windows
        assert!(started.elapsed() >= Duration::from_millis(190));
    }
}
