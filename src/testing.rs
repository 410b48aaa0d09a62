//! Testing utilities for bulksel
//!
//! Provides a `TestStore` wrapper for temporary lead stores plus small
//! in-memory collaborators (`FakeSource`, `RecordingMutation`) for exercising
//! views without a database.
//!
//! Only available when compiled with `cfg(test)`.

use crate::pagination::{CollectionPage, Cursor, Keyed, PageSource};
use crate::selection::{PayloadMode, SelectionPayload};
use crate::store::LeadStore;
use crate::view::{BulkMutation, BulkOutcome};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use tempfile::TempDir;

/// Temporary lead store that is removed on drop
pub struct TestStore {
    _dir: TempDir,
    store: LeadStore,
}

impl TestStore {
    /// Open a fresh store in a new temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = LeadStore::open(dir.path().join("store")).expect("Failed to open test store");
        Self { _dir: dir, store }
    }

    #[must_use]
    pub const fn store(&self) -> &LeadStore {
        &self.store
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal keyed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub tag: String,
}

impl Row {
    #[must_use]
    pub fn new(id: u32, tag: &str) -> Self {
        Self {
            id,
            tag: tag.to_string(),
        }
    }
}

impl Keyed for Row {
    type Key = u32;

    fn key(&self) -> &u32 {
        &self.id
    }
}

/// Filter over [`Row`]s by tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowFilter {
    pub tag: Option<String>,
}

impl RowFilter {
    #[must_use]
    pub fn tagged(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.tag.as_ref().is_none_or(|t| &row.tag == t)
    }
}

/// Error raised by [`FakeSource`] on request
#[derive(Debug, thiserror::Error)]
#[error("fake source failure")]
pub struct FakeError;

/// In-memory page source with offset cursors
#[derive(Debug, Default)]
pub struct FakeSource {
    rows: Vec<Row>,
    fail_next: Cell<bool>,
}

impl FakeSource {
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make the next fetch fail
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        self.rows.clone()
    }
}

impl PageSource for FakeSource {
    type Item = Row;
    type Filter = RowFilter;
    type Error = FakeError;

    fn fetch(
        &self,
        filter: &RowFilter,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<CollectionPage<Row>, FakeError> {
        if self.fail_next.replace(false) {
            return Err(FakeError);
        }

        let matching: Vec<&Row> = self.rows.iter().filter(|r| filter.matches(r)).collect();
        let start = cursor
            .and_then(|c| c.as_str().parse::<usize>().ok())
            .unwrap_or(0);
        let end = (start + page_size).min(matching.len());
        let has_next_page = end < matching.len();

        Ok(CollectionPage {
            items: matching[start.min(end)..end].iter().map(|r| (*r).clone()).collect(),
            next_cursor: has_next_page.then(|| Cursor::new(end.to_string())),
            has_next_page,
            total_count: matching.len() as u64,
        })
    }
}

/// Bulk mutation that records its calls and "creates" every resolved row
#[derive(Debug, Default)]
pub struct RecordingMutation {
    rows: Vec<Row>,
    calls: RefCell<Vec<(SelectionPayload<u32>, RowFilter)>>,
}

impl RecordingMutation {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            calls: RefCell::default(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<(SelectionPayload<u32>, RowFilter)> {
        self.calls.borrow().clone()
    }
}

impl BulkMutation<u32, RowFilter> for RecordingMutation {
    type Error = FakeError;

    fn apply(
        &self,
        payload: &SelectionPayload<u32>,
        filter: &RowFilter,
    ) -> Result<BulkOutcome, FakeError> {
        self.calls
            .borrow_mut()
            .push((payload.clone(), filter.clone()));

        let mut outcome = BulkOutcome::new();
        match payload.mode {
            PayloadMode::Selected => {
                for (index, id) in payload.selected_ids.iter().enumerate() {
                    if self.rows.iter().any(|r| r.id == *id && filter.matches(r)) {
                        outcome.add_created();
                    } else {
                        outcome.add_error(index, format!("row {id} not found"));
                    }
                }
            }
            PayloadMode::AllExcept => {
                let excluded: HashSet<u32> = payload.deselected_ids.iter().copied().collect();
                for row in &self.rows {
                    if filter.matches(row) && !excluded.contains(&row.id) {
                        outcome.add_created();
                    }
                }
            }
        }
        Ok(outcome)
    }
}
