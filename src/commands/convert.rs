//! Convert command - bulk-convert selected leads into contacts
//!
//! Builds the selection through a [`ListView`] exactly as an interactive
//! screen would (select all / select page / toggle rows), then submits the
//! resulting payload to the store's conversion mutation. The first page is
//! echoed with its checkboxes so the user sees what the selection covers.

use crate::{
    BulkselError, output,
    selection::SelectionMode,
    store::{LeadFilter, LeadStore},
    view::ListView,
};
use colored::Colorize;
use dialoguer::Confirm;
use std::collections::BTreeSet;

type Result<T> = std::result::Result<T, BulkselError>;

/// How the selection is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every matching lead, minus exceptions
    All { except: Vec<String> },
    /// The first page of matching leads, minus exceptions
    Page { except: Vec<String> },
    /// Exactly these leads
    Ids(Vec<String>),
}

/// Options for the convert command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub page_size: usize,
    pub dry_run: bool,
    /// Ask before submitting
    pub confirm: bool,
    pub quiet: bool,
}

/// Apply `selection` to `view` through the engine's commands
pub fn build_selection(view: &mut ListView<'_, LeadStore>, selection: &Selection) {
    match selection {
        Selection::All { except } => {
            view.select_all();
            for id in unique(except) {
                view.toggle_item(id);
            }
        }
        Selection::Page { except } => {
            view.select_visible();
            for id in unique(except) {
                if view.is_selected(&id) {
                    view.toggle_item(id);
                }
            }
        }
        Selection::Ids(ids) => {
            for id in unique(ids) {
                if !view.is_selected(&id) {
                    view.toggle_item(id);
                }
            }
        }
    }
}

fn unique(ids: &[String]) -> BTreeSet<String> {
    ids.iter().cloned().collect()
}

/// Execute the convert command
///
/// # Errors
///
/// Returns `BulkselError` if the filter is invalid, the first page cannot
/// be fetched, nothing ends up selected, confirmation fails, or the
/// conversion cannot run at all. Per-lead failures are reported, not
/// returned.
pub fn execute(
    store: &LeadStore,
    filter: LeadFilter,
    selection: &Selection,
    options: ConvertOptions,
) -> Result<()> {
    let mut view = ListView::open(store, filter, options.page_size)?;
    build_selection(&mut view, selection);

    let payload = view.payload();
    let count = view.selected_count();
    if view.selection_mode() == SelectionMode::None || payload.is_empty() {
        return Err(BulkselError::InvalidInput("No leads selected".into()));
    }

    if !options.quiet {
        println!(
            "{} Selected {} (first page header {})",
            "→".cyan(),
            output::payload_summary(&payload, count),
            output::header_glyph(view.header_state())
        );
        for lead in view.items() {
            let selected = view.is_selected(&lead.id);
            println!("{}", output::lead_row(lead, Some(selected), false));
        }
    }

    if options.dry_run {
        println!("{}", "=== Dry Run Mode ===".yellow().bold());
        println!("{}", serde_json::to_string_pretty(&payload)?);
        println!("\n{}", "Run without --dry-run to convert.".yellow());
        return Ok(());
    }

    if options.confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Convert {count} lead(s) into contacts?"))
            .interact()
            .map_err(|e| BulkselError::InvalidInput(format!("Failed to get confirmation: {e}")))?;
        if !confirmed {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let outcome = view.submit(&store.convert_to_contacts())?;
    println!("{}", output::bulk_outcome(&outcome, options.quiet));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::PayloadMode;
    use crate::store::NewLead;
    use crate::testing::TestStore;

    fn seed(store: &LeadStore, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                store
                    .insert_lead(NewLead::new(format!("Lead {i}"), "", "r1"))
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn test_build_all_with_duplicate_exceptions() {
        let test_store = TestStore::new();
        let store = test_store.store();
        let ids = seed(store, 5);

        let mut view = ListView::open(store, LeadFilter::default(), 2).unwrap();
        let except = vec![ids[4].clone(), ids[4].clone()];
        build_selection(&mut view, &Selection::All { except });

        let payload = view.payload();
        assert_eq!(payload.mode, PayloadMode::AllExcept);
        assert_eq!(payload.deselected_ids, vec![ids[4].clone()]);
        assert_eq!(view.selected_count(), 4);
    }

    #[test]
    fn test_build_page_minus_exception() {
        let test_store = TestStore::new();
        let store = test_store.store();
        let ids = seed(store, 5);

        let mut view = ListView::open(store, LeadFilter::default(), 3).unwrap();
        let except = vec![ids[1].clone(), ids[4].clone()];
        build_selection(&mut view, &Selection::Page { except });

        let payload = view.payload();
        assert_eq!(payload.mode, PayloadMode::Selected);
        assert_eq!(payload.selected_ids, vec![ids[0].clone(), ids[2].clone()]);
        assert_eq!(view.selection_mode(), SelectionMode::Manual);
    }

    #[test]
    fn test_build_ids() {
        let test_store = TestStore::new();
        let store = test_store.store();
        let ids = seed(store, 3);

        let mut view = ListView::open(store, LeadFilter::default(), 10).unwrap();
        build_selection(&mut view, &Selection::Ids(vec![ids[2].clone(), ids[0].clone()]));

        assert_eq!(view.selection_mode(), SelectionMode::Manual);
        assert_eq!(view.payload().selected_ids, vec![ids[0].clone(), ids[2].clone()]);
    }

    #[test]
    fn test_execute_converts_without_prompt() {
        let test_store = TestStore::new();
        let store = test_store.store();
        seed(store, 4);

        let options = ConvertOptions {
            page_size: 2,
            dry_run: false,
            confirm: false,
            quiet: true,
        };
        execute(
            store,
            LeadFilter::default(),
            &Selection::All { except: vec![] },
            options,
        )
        .unwrap();
        assert_eq!(store.contact_count(), 4);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let test_store = TestStore::new();
        let store = test_store.store();
        seed(store, 2);

        let options = ConvertOptions {
            page_size: 10,
            dry_run: true,
            confirm: false,
            quiet: true,
        };
        execute(
            store,
            LeadFilter::default(),
            &Selection::All { except: vec![] },
            options,
        )
        .unwrap();
        assert_eq!(store.contact_count(), 0);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let test_store = TestStore::new();
        let store = test_store.store();
        let ids = seed(store, 1);

        let options = ConvertOptions {
            page_size: 10,
            dry_run: false,
            confirm: false,
            quiet: true,
        };
        let result = execute(
            store,
            LeadFilter::default(),
            &Selection::Page { except: ids },
            options,
        );
        assert!(matches!(result, Err(BulkselError::InvalidInput(_))));
    }
}
