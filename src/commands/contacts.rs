//! Contacts command - list converted contacts

use crate::{BulkselError, output, store::LeadStore};

type Result<T> = std::result::Result<T, BulkselError>;

/// Execute the contacts command
///
/// # Errors
///
/// Returns `BulkselError` if the contacts cannot be read.
pub fn execute(store: &LeadStore, quiet: bool) -> Result<()> {
    let contacts = store.list_contacts()?;

    if contacts.is_empty() {
        if !quiet {
            println!("No contacts yet.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Contacts:");
    }
    for contact in &contacts {
        println!("{}", output::contact_row(contact, quiet));
    }
    Ok(())
}
