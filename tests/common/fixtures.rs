//! CSV fixtures and handler factories

use solen::core::batch::BatchConfig;
use solen::core::bulk::{BulkAction, BulkHandler, BulkLedger, BulkSettings};
use solen::core::confirm::{PollConfig, SignatureConfirmer};
use solen::rpc::RpcClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const ENV: &str = "devnet";

pub const ABC_TRANSFERS: &str = "dest,amount\nA,1.0\nB,2.5\nC,0.25\n";

pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// `count` transfer rows to `W0`, `W1`, ... of one token each
pub fn many_transfers(count: usize) -> String {
    let mut csv = String::from("dest,amount\n");
    for i in 0..count {
        csv.push_str(&format!("W{},1\n", i));
    }
    csv
}

/// Handler with millisecond polling and no rate limits
pub fn handler<A: BulkAction>(
    action: A,
    rpc: Arc<dyn RpcClient>,
    data_folder: &Path,
) -> BulkHandler<A> {
    handler_with(action, rpc, data_folder, BatchConfig::new().with_rate_limits(vec![]))
}

pub fn handler_with<A: BulkAction>(
    action: A,
    rpc: Arc<dyn RpcClient>,
    data_folder: &Path,
    batch: BatchConfig,
) -> BulkHandler<A> {
    let poll = PollConfig::new()
        .with_interval(Duration::from_millis(1))
        .with_max_retries(2);
    let settings = BulkSettings::new(ENV, data_folder)
        .with_transient_backoff(Duration::from_millis(1))
        .with_batch(batch);
    BulkHandler::new(action, SignatureConfirmer::new(rpc, poll), settings).unwrap()
}

pub async fn load_ledger<A: BulkAction>(job: &BulkHandler<A>, csv: &Path) -> BulkLedger {
    BulkLedger::load(job.ledger_path(csv).unwrap()).await.unwrap()
}
