//! Wire descriptor for bulk mutations
//!
//! A [`SelectionPayload`] is what leaves the client when a bulk action is
//! submitted. It never lists an unbounded "all" set: `ALL_EXCEPT` carries
//! only the exceptions and the receiving side resolves the rest against its
//! own copy of the filter.

use super::state::{SelectionId, SelectionState};
use serde::{Deserialize, Serialize};

/// How the receiving side interprets the id lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadMode {
    /// Exactly the records in `selected_ids`
    Selected,
    /// Every record matching the filter except `deselected_ids`
    AllExcept,
}

/// Minimal description of a selection for a bulk mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPayload<Id> {
    pub mode: PayloadMode,
    pub selected_ids: Vec<Id>,
    pub deselected_ids: Vec<Id>,
}

impl<Id: SelectionId> SelectionPayload<Id> {
    /// Translate a selection into its payload
    ///
    /// Id lists are sorted so the same selection always yields the same
    /// bytes on the wire.
    #[must_use]
    pub fn from_state(state: &SelectionState<Id>) -> Self {
        match state {
            SelectionState::All { deselected } => Self {
                mode: PayloadMode::AllExcept,
                selected_ids: Vec::new(),
                deselected_ids: sorted(deselected.iter().cloned()),
            },
            SelectionState::Page { selected } | SelectionState::Manual { selected } => Self {
                mode: PayloadMode::Selected,
                selected_ids: sorted(selected.iter().cloned()),
                deselected_ids: Vec::new(),
            },
            SelectionState::None => Self {
                mode: PayloadMode::Selected,
                selected_ids: Vec::new(),
                deselected_ids: Vec::new(),
            },
        }
    }

    /// Whether the payload can select nothing at all
    ///
    /// `ALL_EXCEPT` is never considered empty because it is resolved later.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode == PayloadMode::Selected && self.selected_ids.is_empty()
    }
}

fn sorted<Id: Ord>(ids: impl Iterator<Item = Id>) -> Vec<Id> {
    let mut out: Vec<Id> = ids.collect();
    out.sort_unstable();
    out
}
