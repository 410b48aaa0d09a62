//! List command - page through leads matching a filter

use crate::{BulkselError, output, store::LeadFilter, store::LeadStore, view::ListView};
use colored::Colorize;

type Result<T> = std::result::Result<T, BulkselError>;

/// Execute the list command
///
/// Opens a view, loads up to `pages` pages and prints the accumulated rows.
///
/// # Errors
///
/// Returns `BulkselError` if the filter is invalid or a page cannot be fetched.
pub fn execute(
    store: &LeadStore,
    filter: LeadFilter,
    pages: usize,
    page_size: usize,
    quiet: bool,
) -> Result<()> {
    let mut view = ListView::open(store, filter, page_size)?;
    if pages > 1 {
        view.load_pages(pages - 1)?;
    }

    if view.items().is_empty() {
        if !quiet {
            println!("No leads match the filter.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Leads ({} matching):", view.total_count());
    }
    for lead in view.items() {
        println!("{}", output::lead_row(lead, None, quiet));
    }

    if !quiet {
        let shown = view.items().len();
        if view.has_next_page() {
            println!(
                "{}",
                format!(
                    "Showing {shown} of {}. Use --pages to load more.",
                    view.total_count()
                )
                .dimmed()
            );
        } else {
            println!("{}", format!("Showing all {shown}.").dimmed());
        }
    }
    Ok(())
}
