//! Import command - load leads from CSV

use crate::{BulkselError, store::LeadStore};
use std::fs::File;
use std::path::Path;

type Result<T> = std::result::Result<T, BulkselError>;

/// Execute the import command
///
/// # Errors
///
/// Returns `BulkselError` if the file cannot be opened or contains a
/// malformed row. Nothing is written in that case.
pub fn execute(store: &LeadStore, file: &Path, quiet: bool) -> Result<()> {
    let reader = File::open(file).map_err(|e| {
        BulkselError::InvalidInput(format!("Failed to read {}: {e}", file.display()))
    })?;
    let summary = store.import_csv(reader)?;

    if quiet {
        for id in &summary.ids {
            println!("{id}");
        }
    } else {
        println!(
            "Imported {} lead(s) from {}",
            summary.imported,
            file.display()
        );
    }
    Ok(())
}
