//! CSV ingestion into ledger rows

use crate::utils::error::{Result, SolenError};
use std::collections::BTreeMap;
use std::path::Path;

/// Columns a job type reads from its CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    /// Must be present in the header and non-empty on every row
    pub required: &'static [&'static str],
    /// Kept when present and non-empty; any other column is dropped
    pub optional: &'static [&'static str],
    /// Thousands separators are stripped from these before storage
    pub numeric: &'static [&'static str],
    /// `(header, column)` pairs accepted in place of a column name
    pub aliases: &'static [(&'static str, &'static str)],
}

impl ColumnSchema {
    fn canonical<'a>(&self, header: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == header)
            .map(|(_, column)| *column)
            .unwrap_or(header)
    }

    fn is_known(&self, column: &str) -> bool {
        self.required.contains(&column) || self.optional.contains(&column)
    }
}

/// Reject anything that is not an existing `.csv` file
pub fn validate_csv_path(path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if extension != "csv" {
        return Err(SolenError::invalid_input(format!(
            "unsupported file type: .{}, expecting csv",
            extension
        )));
    }
    if !path.is_file() {
        return Err(SolenError::invalid_input(format!(
            "missing file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Parse the CSV into one field map per data row, restricted to the schema
pub fn read_rows(path: &Path, schema: &ColumnSchema) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| schema.canonical(h).to_string())
        .collect();

    let missing: Vec<&str> = schema
        .required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == column))
        .collect();
    if !missing.is_empty() {
        return Err(SolenError::invalid_input(format!(
            "{}: missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = i + 2;
        let mut fields = BTreeMap::new();

        for (column, value) in headers.iter().zip(record.iter()) {
            if !schema.is_known(column) {
                continue;
            }
            let value = if schema.numeric.contains(&column.as_str()) {
                value.replace(',', "")
            } else {
                value.to_string()
            };

            if value.is_empty() {
                if schema.required.contains(&column.as_str()) {
                    return Err(SolenError::invalid_input(format!(
                        "line {}: empty value for required column {}",
                        line, column
                    )));
                }
                continue;
            }
            if schema.numeric.contains(&column.as_str()) && value.parse::<f64>().is_err() {
                return Err(SolenError::invalid_input(format!(
                    "line {}: {} is not a number: {:?}",
                    line, column, value
                )));
            }
            fields.insert(column.clone(), value);
        }
        rows.push(fields);
    }
    Ok(rows)
}
