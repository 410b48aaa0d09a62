//! Selection state engine
//!
//! Tracks which records of a filtered, server-paginated collection are
//! selected without ever knowing the whole collection.
//!
//! "Select all" is stored as a complement: only the records the user
//! explicitly excluded are kept, so memory and payload size grow with the
//! number of exclusions rather than the size of the collection.
//!
//! ```text
//!            select_page / select_all / select_none (from any state)
//!   ┌──────┐ ─────────────────────────────────────────▶ ┌────────┐
//!   │ None │                                            │  Page  │
//!   └──────┘ ◀── toggle empties set ── ┌────────┐ ◀──── └────────┘
//!       ▲                              │ Manual │  toggle
//!       └──── toggle empties set ───── └────────┘
//!
//!   ┌─────┐  toggle flips exceptions, never leaves All
//!   │ All │ ◀─┐
//!   └─────┘ ──┘
//! ```

use super::payload::SelectionPayload;
use std::collections::HashSet;
use std::hash::Hash;

/// Bounds required of a record identifier
///
/// Identifiers are hashed for O(1) membership checks and ordered so that
/// payloads are deterministic on the wire.
pub trait SelectionId: Clone + Eq + Hash + Ord {}

impl<T: Clone + Eq + Hash + Ord> SelectionId for T {}

/// Discriminant of a [`SelectionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Nothing selected
    #[default]
    None,
    /// Exactly the rows of one rendered page were selected in one step
    Page,
    /// Rows were picked one by one
    Manual,
    /// Every record matching the active filter, minus exceptions
    All,
}

/// Tri-state of a "select this page" header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckbox {
    /// No row on the page is selected
    Empty,
    /// Some but not all rows on the page are selected
    Indeterminate,
    /// Every row on the page is selected
    Checked,
}

/// Which records of the current collection are selected
///
/// `All` owns only its exceptions; the other selecting variants own only the
/// selected set. A variant never carries the set that is meaningless for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState<Id: SelectionId> {
    /// Nothing selected
    None,
    /// A page of rows selected in one step
    Page {
        /// Selected ids
        selected: HashSet<Id>,
    },
    /// Rows toggled individually
    Manual {
        /// Selected ids
        selected: HashSet<Id>,
    },
    /// Everything matching the filter except `deselected`
    All {
        /// Exceptions to "everything selected"
        deselected: HashSet<Id>,
    },
}

impl<Id: SelectionId> Default for SelectionState<Id> {
    fn default() -> Self {
        Self::None
    }
}

impl<Id: SelectionId> SelectionState<Id> {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::None
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::None => SelectionMode::None,
            Self::Page { .. } => SelectionMode::Page,
            Self::Manual { .. } => SelectionMode::Manual,
            Self::All { .. } => SelectionMode::All,
        }
    }

    /// Flip a single record
    ///
    /// In `All` the id moves in or out of the exception set and the mode is
    /// kept. Otherwise the id moves in or out of the selected set; an empty
    /// result decays to `None`, anything else becomes `Manual`.
    pub fn toggle_item(&mut self, id: Id) {
        if let Self::All { deselected } = self {
            if !deselected.remove(&id) {
                deselected.insert(id);
            }
            return;
        }

        let mut selected = match std::mem::take(self) {
            Self::Page { selected } | Self::Manual { selected } => selected,
            Self::None | Self::All { .. } => HashSet::new(),
        };

        if !selected.remove(&id) {
            selected.insert(id);
        }

        *self = if selected.is_empty() {
            Self::None
        } else {
            Self::Manual { selected }
        };
    }

    /// Clear everything
    pub fn select_none(&mut self) {
        *self = Self::None;
    }

    /// Select exactly the given rows, replacing any previous selection
    ///
    /// Duplicates in `page_ids` collapse.
    pub fn select_page<I>(&mut self, page_ids: I)
    where
        I: IntoIterator<Item = Id>,
    {
        *self = Self::Page {
            selected: page_ids.into_iter().collect(),
        };
    }

    /// Select every record matching the active filter
    ///
    /// Nothing is snapshotted; the set is resolved by whoever executes the
    /// bulk action.
    pub fn select_all(&mut self) {
        *self = Self::All {
            deselected: HashSet::new(),
        };
    }

    /// Whether `id` is currently selected
    #[must_use]
    pub fn is_selected(&self, id: &Id) -> bool {
        match self {
            Self::None => false,
            Self::Page { selected } | Self::Manual { selected } => selected.contains(id),
            Self::All { deselected } => !deselected.contains(id),
        }
    }

    /// Number of selected records
    ///
    /// `total_count` must be the collection's current authoritative total;
    /// it is only consulted in `All`.
    #[must_use]
    pub fn selected_count(&self, total_count: u64) -> u64 {
        match self {
            Self::None => 0,
            Self::Page { selected } | Self::Manual { selected } => selected.len() as u64,
            Self::All { deselected } => total_count.saturating_sub(deselected.len() as u64),
        }
    }

    /// Header checkbox state for the rows currently rendered
    #[must_use]
    pub fn header_state(&self, page_ids: &[Id]) -> HeaderCheckbox {
        match self {
            Self::All { deselected } => {
                if deselected.is_empty() || !page_ids.iter().any(|id| deselected.contains(id)) {
                    HeaderCheckbox::Checked
                } else {
                    HeaderCheckbox::Indeterminate
                }
            }
            Self::None => HeaderCheckbox::Empty,
            Self::Page { selected } | Self::Manual { selected } => {
                let hits = page_ids.iter().filter(|id| selected.contains(*id)).count();
                if hits == 0 {
                    HeaderCheckbox::Empty
                } else if hits == page_ids.len() {
                    HeaderCheckbox::Checked
                } else {
                    HeaderCheckbox::Indeterminate
                }
            }
        }
    }

    /// Ids explicitly selected (empty in `All` and `None`)
    #[must_use]
    pub fn selected_ids(&self) -> Option<&HashSet<Id>> {
        match self {
            Self::Page { selected } | Self::Manual { selected } => Some(selected),
            Self::None | Self::All { .. } => None,
        }
    }

    /// Exceptions to "everything selected" (only in `All`)
    #[must_use]
    pub const fn deselected_ids(&self) -> Option<&HashSet<Id>> {
        match self {
            Self::All { deselected } => Some(deselected),
            _ => None,
        }
    }

    /// Whether any record is (or may be) selected
    ///
    /// `All` counts as non-empty even with a zero total, since it is a live
    /// predicate over the filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Minimal descriptor for a bulk mutation
    #[must_use]
    pub fn payload(&self) -> SelectionPayload<Id> {
        SelectionPayload::from_state(self)
    }
}
