//! CSV lead import
//!
//! Expected header: `name,email,company,run_id`. `email` and `company` may
//! be empty. The whole file is parsed before anything is written, so a
//! malformed row aborts the import without a partial write.

use super::types::NewLead;
use super::{LeadStore, StoreError};
use std::io::Read;
use tracing::info;

type Result<T> = std::result::Result<T, StoreError>;

/// Result of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Leads written
    pub imported: usize,
    /// Ids assigned, in input order
    pub ids: Vec<String>,
}

/// Parse CSV lead rows
///
/// # Errors
///
/// Returns `StoreError::InvalidInput` naming the offending line when a row
/// cannot be parsed or lacks a name or run id, and `StoreError::CsvError`
/// when the input itself cannot be read.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewLead>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(row_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: NewLead = record
            .deserialize(Some(&headers))
            .map_err(|e| StoreError::InvalidInput(format!("line {line}: {e}")))?;
        if row.name.is_empty() || row.run_id.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "line {line}: name and run_id are required"
            )));
        }
        rows.push(NewLead {
            company: row.company.filter(|c| !c.is_empty()),
            ..row
        });
    }
    Ok(rows)
}

/// Positioned errors belong to a row; anything else is a reader failure
fn row_error(error: csv::Error) -> StoreError {
    match error.position().map(csv::Position::line) {
        Some(line) => StoreError::InvalidInput(format!("line {line}: {error}")),
        None => StoreError::CsvError(error),
    }
}

impl LeadStore {
    /// Import leads from CSV
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidInput` for malformed input and other
    /// `StoreError` variants if writing fails.
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<ImportSummary> {
        let rows = parse_csv(reader)?;
        let mut summary = ImportSummary::default();
        for row in rows {
            let lead = self.insert_lead(row)?;
            summary.ids.push(lead.id);
            summary.imported += 1;
        }
        self.flush()?;
        info!(imported = summary.imported, "imported leads");
        Ok(summary)
    }
}
