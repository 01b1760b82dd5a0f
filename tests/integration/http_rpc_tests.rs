//! A bulk confirm step against a mocked JSON-RPC endpoint

#[cfg(test)]
mod tests {
    use crate::common::RecordingTransfer;
    use crate::common::fixtures::{self, ABC_TRANSFERS};
    use serde_json::json;
    use solen::core::bulk::RunOptions;
    use solen::rpc::{HttpRpcClient, HttpRpcConfig};
    use std::sync::Arc;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn status_body(status: serde_json::Value) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 250 }, "value": [status] }
        })
    }

    async fn mount_status(server: &MockServer, signature: &str, status: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "getSignatureStatuses",
                "params": [[signature], { "searchTransactionHistory": true }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(status)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_confirm_over_http() {
        let server = MockServer::start().await;
        let finalized = json!({
            "slot": 240,
            "confirmations": null,
            "err": null,
            "confirmationStatus": "finalized"
        });
        let failed = json!({
            "slot": 241,
            "confirmations": null,
            "err": { "InstructionError": [0, { "Custom": 1 }] },
            "confirmationStatus": "finalized"
        });
        mount_status(&server, "sig-A", finalized.clone()).await;
        mount_status(&server, "sig-B", failed).await;
        mount_status(&server, "sig-C", serde_json::Value::Null).await;

        let rpc = Arc::new(HttpRpcClient::new(HttpRpcConfig::new(server.uri())).unwrap());
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), rpc, dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.polled, 3);
        assert_eq!(report.newly_finalized, 1);

        let ledger = fixtures::load_ledger(&job, &csv).await;
        assert!(ledger.get(0).unwrap().finalized);
        assert!(!ledger.get(1).unwrap().finalized);
        assert!(!ledger.get(2).unwrap().finalized);
    }

    #[tokio::test]
    async fn test_node_behind_leaves_rows_for_next_confirm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32005, "message": "Node is behind by 169 slots" }
            })))
            .mount(&server)
            .await;

        let rpc = Arc::new(HttpRpcClient::new(HttpRpcConfig::new(server.uri())).unwrap());
        let dir = TempDir::new().unwrap();
        let csv = fixtures::write_csv(dir.path(), "drop.csv", ABC_TRANSFERS);
        let job = fixtures::handler(RecordingTransfer::default(), rpc, dir.path());
        job.init(&csv).await.unwrap();
        job.run(&csv, RunOptions::default()).await.unwrap();

        let report = job.confirm(&csv).await.unwrap();
        assert_eq!(report.newly_finalized, 0);
        assert_eq!(job.status(&csv).await.unwrap().unfinalized, 3);
    }
}
