//! Durable JSON ledger of a bulk job

use crate::utils::error::{Result, SolenError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One row of a bulk job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Input columns as read from the CSV
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub finalized: bool,
    /// Transaction signature, empty until submitted successfully
    #[serde(default)]
    pub signature: String,
    /// Last error, empty on success
    #[serde(default)]
    pub error: String,
    /// Elapsed time of the last attempt, `H:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl WorkItem {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self {
            fields,
            finalized: false,
            signature: String::new(),
            error: String::new(),
            time: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_sent(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Not sent and the last attempt failed
    pub fn is_failed(&self) -> bool {
        !self.is_sent() && !self.error.is_empty()
    }
}

/// Rows of one bulk job keyed by their CSV position, bound to the file they
/// are persisted in
#[derive(Debug, Clone, PartialEq)]
pub struct BulkLedger {
    path: PathBuf,
    rows: BTreeMap<usize, WorkItem>,
}

impl BulkLedger {
    /// `<data_folder>/<env>_<csv name with .json extension>`
    pub fn path_for(data_folder: &Path, env: &str, csv_path: &Path) -> Result<PathBuf> {
        if env.is_empty() {
            return Err(SolenError::invalid_input("missing environment name"));
        }
        let file_name = csv_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SolenError::invalid_input(format!("invalid csv path: {}", csv_path.display()))
            })?;
        let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
        Ok(data_folder.join(format!("{}_{}.json", env, stem)))
    }

    pub fn new(path: impl Into<PathBuf>, rows: Vec<WorkItem>) -> Self {
        Self {
            path: path.into(),
            rows: rows.into_iter().enumerate().collect(),
        }
    }

    pub async fn exists(path: &Path) -> Result<bool> {
        tokio::fs::try_exists(path).await.map_err(|e| {
            SolenError::ledger_io(format!("Failed to check {}: {}", path.display(), e))
        })
    }

    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SolenError::missing_ledger(format!(
                    "{} does not exist, run init first",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(SolenError::ledger_io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let rows = serde_json::from_str(&content).map_err(|e| {
            SolenError::ledger_io(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        debug!("Loaded ledger {}", path.display());
        Ok(Self { path, rows })
    }

    /// Write to a sibling temp file and rename it over the ledger
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SolenError::ledger_io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_vec(&self.rows)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await.map_err(|e| {
            SolenError::ledger_io(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            SolenError::ledger_io(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &WorkItem)> {
        self.rows.iter().map(|(index, item)| (*index, item))
    }

    pub fn get(&self, index: usize) -> Option<&WorkItem> {
        self.rows.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WorkItem> {
        self.rows.get_mut(&index)
    }

    /// Rows `run` should submit, in ledger order: those without a signature,
    /// plus sent but unfinalized rows when `include_unfinalized` is set
    pub fn pending(&self, include_unfinalized: bool) -> Vec<usize> {
        self.rows()
            .filter(|(_, item)| !item.is_sent() || (include_unfinalized && !item.finalized))
            .map(|(index, _)| index)
            .collect()
    }

    /// Signatures `confirm` should poll, with their row index
    pub fn unfinalized(&self) -> Vec<(usize, String)> {
        self.rows()
            .filter(|(_, item)| item.is_sent() && !item.finalized)
            .map(|(index, item)| (index, item.signature.clone()))
            .collect()
    }

    /// Mark a row finalized. Finality is never revoked.
    pub fn mark_finalized(&mut self, index: usize) -> bool {
        match self.rows.get_mut(&index) {
            Some(item) if item.is_sent() && !item.finalized => {
                item.finalized = true;
                true
            }
            _ => false,
        }
    }

    pub fn finalized_count(&self) -> usize {
        self.rows.values().filter(|item| item.finalized).count()
    }
}
