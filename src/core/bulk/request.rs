//! Typed per-row requests for each bulk job type

use super::ingest::ColumnSchema;
use crate::utils::error::{Result, SolenError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request built from one ledger row
pub trait BulkRequest: Sized + Send + Sync {
    /// Whether summaries report amount totals, even for an empty ledger
    const MOVES_VALUE: bool = false;

    /// Columns this job type reads from its CSV
    fn schema() -> &'static ColumnSchema;

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self>;

    /// Amount moved by this request, for jobs that move value
    fn amount(&self) -> Option<f64> {
        None
    }
}

fn required<'a>(fields: &'a BTreeMap<String, String>, column: &str) -> Result<&'a str> {
    fields
        .get(column)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SolenError::invalid_input(format!("missing value for {}", column)))
}

/// Token transfer to one wallet
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub dest: String,
    pub amount: f64,
}

static TRANSFER_SCHEMA: ColumnSchema = ColumnSchema {
    required: &["dest", "amount"],
    optional: &[],
    numeric: &["amount"],
    aliases: &[("wallet", "dest")],
};

impl BulkRequest for TransferRequest {
    const MOVES_VALUE: bool = true;

    fn schema() -> &'static ColumnSchema {
        &TRANSFER_SCHEMA
    }

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        let dest = required(fields, "dest")?.to_string();
        let raw = required(fields, "amount")?;
        let amount: f64 = raw
            .parse()
            .map_err(|_| SolenError::invalid_input(format!("invalid amount: {:?}", raw)))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(SolenError::invalid_input(format!("invalid amount: {}", amount)));
        }
        Ok(Self { dest, amount })
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

/// Creator entry as supplied by an operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorSpec {
    pub address: String,
    #[serde(default)]
    pub verified: bool,
    pub share: u8,
}

/// Metadata fields to overwrite; `None` keeps the on-chain value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    /// Seller fee in basis points
    pub fee: Option<u16>,
    pub creators: Option<Vec<CreatorSpec>>,
}

impl MetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.symbol.is_none()
            && self.uri.is_none()
            && self.fee.is_none()
            && self.creators.is_none()
    }
}

/// Metadata update of one mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataUpdateRequest {
    pub mint: String,
    pub update: MetadataUpdate,
}

static METADATA_UPDATE_SCHEMA: ColumnSchema = ColumnSchema {
    required: &["mint_address"],
    optional: &["uri", "name", "symbol", "fee", "creators"],
    numeric: &["fee"],
    aliases: &[("mint", "mint_address")],
};

impl BulkRequest for MetadataUpdateRequest {
    fn schema() -> &'static ColumnSchema {
        &METADATA_UPDATE_SCHEMA
    }

    fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        let mint = required(fields, "mint_address")?.to_string();
        let text = |column: &str| fields.get(column).filter(|v| !v.is_empty()).cloned();

        let fee = match text("fee") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                SolenError::invalid_input(format!("invalid fee for {}: {:?}", mint, raw))
            })?),
            None => None,
        };
        let creators = match text("creators") {
            Some(raw) => Some(serde_json::from_str::<Vec<CreatorSpec>>(&raw).map_err(|e| {
                SolenError::invalid_input(format!("invalid creators for {}: {}", mint, e))
            })?),
            None => None,
        };

        Ok(Self {
            update: MetadataUpdate {
                name: text("name"),
                symbol: text("symbol"),
                uri: text("uri"),
                fee,
                creators,
            },
            mint,
        })
    }
}
