//! Bulk actions that record what the engine asks of them

use async_trait::async_trait;
use parking_lot::Mutex;
use solen::core::bulk::{BulkAction, SubmitOptions, TransferRequest};
use solen::utils::error::{Result, SolenError};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum Script {
    Transient,
    Rejected,
    /// Never completes, standing in for a process killed mid-row
    Hang,
}

/// Transfer action returning `sig-<dest>` unless scripted otherwise
#[derive(Default)]
pub struct RecordingTransfer {
    calls: Mutex<Vec<String>>,
    scripts: Mutex<HashMap<String, Script>>,
}

impl RecordingTransfer {
    pub fn with_script(self, dest: &str, script: Script) -> Self {
        self.scripts.lock().insert(dest.to_string(), script);
        self
    }

    pub fn clear_script(&self, dest: &str) {
        self.scripts.lock().remove(dest);
    }

    /// Destinations submitted so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl BulkAction for RecordingTransfer {
    type Request = TransferRequest;

    fn name(&self) -> &'static str {
        "transfer"
    }

    async fn submit(&self, request: &TransferRequest, _: SubmitOptions) -> Result<String> {
        self.calls.lock().push(request.dest.clone());
        let script = self.scripts.lock().get(&request.dest).cloned();
        match script {
            None => Ok(format!("sig-{}", request.dest)),
            Some(Script::Transient) => Err(SolenError::remote_transient("Node is behind by 12 slots")),
            Some(Script::Rejected) => Err(SolenError::remote_rejected("insufficient funds")),
            Some(Script::Hang) => futures::future::pending().await,
        }
    }
}
