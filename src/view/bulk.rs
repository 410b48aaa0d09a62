//! Bulk mutation contract
//!
//! The mutation endpoint receives a [`SelectionPayload`] plus a snapshot of
//! the filter it was built under, resolves `ALL_EXCEPT` on its side, and
//! reports aggregate counters with per-item errors. Partial failure is a
//! normal outcome, not an `Err`.

use crate::selection::SelectionPayload;
use serde::{Deserialize, Serialize};

/// A bulk action over a selection
pub trait BulkMutation<Id, F> {
    type Error: std::error::Error;

    /// Apply the action to every record the payload describes under `filter`
    ///
    /// # Errors
    ///
    /// Returns an error only when the mutation could not run at all.
    /// Per-record failures belong in [`BulkOutcome::errors`].
    fn apply(&self, payload: &SelectionPayload<Id>, filter: &F)
    -> Result<BulkOutcome, Self::Error>;
}

/// One record the mutation could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemError {
    /// Position of the record in processing order
    pub index: usize,
    pub message: String,
}

/// Aggregate result of a bulk mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    /// Records the mutation created or converted
    pub created_count: u64,
    /// Records left untouched because there was nothing to do
    pub skipped_count: u64,
    pub error_count: u64,
    pub errors: Vec<BulkItemError>,
}

impl BulkOutcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn add_created(&mut self) {
        self.created_count += 1;
    }

    #[inline]
    pub const fn add_skipped(&mut self) {
        self.skipped_count += 1;
    }

    pub fn add_error(&mut self, index: usize, message: impl Into<String>) {
        self.error_count += 1;
        self.errors.push(BulkItemError {
            index,
            message: message.into(),
        });
    }

    /// Records the mutation looked at
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.created_count + self.skipped_count + self.error_count
    }

    /// Whether every record went through without error
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.error_count == 0
    }
}
