//! Consistency guard
//!
//! Keeps a view's selection honest when the collection underneath it moves.
//!
//! - A new filter signature always clears the selection, so a bulk action can
//!   never run against a different record set than the one the user was
//!   looking at when they selected.
//! - A changing total never clears anything. In `All` the count is derived
//!   from the live total, so records that appear are implicitly selected and
//!   records that vanish are ignored by the bulk mutation.

use crate::selection::{SelectionId, SelectionMode, SelectionState};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Canonical fingerprint of a filter
///
/// Two filters with the same signature select the same records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSignature(String);

impl FilterSignature {
    /// Compute the signature of `filter` from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the filter cannot be serialized.
    pub fn of<F: Serialize>(filter: &F) -> Result<Self, serde_json::Error> {
        serde_json::to_string(filter).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the guard observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    /// Nothing relevant changed
    Unchanged,
    /// Filter changed; `cleared` is true when a non-empty selection was dropped
    FilterChanged { cleared: bool },
    /// First total seen for the current filter
    TotalObserved { total: u64 },
    /// Total grew; in `All` the new records are implicitly selected
    TotalGrew { from: u64, to: u64 },
    /// Total shrank; never forces a reset
    TotalShrank { from: u64, to: u64 },
}

/// Watches the active filter and collection size of one view
#[derive(Debug, Clone)]
pub struct ConsistencyGuard {
    signature: FilterSignature,
    last_total: Option<u64>,
}

impl ConsistencyGuard {
    #[must_use]
    pub const fn new(signature: FilterSignature) -> Self {
        Self {
            signature,
            last_total: None,
        }
    }

    /// Signature of the filter currently in force
    #[must_use]
    pub const fn signature(&self) -> &FilterSignature {
        &self.signature
    }

    /// Last total observed under the current filter
    #[must_use]
    pub const fn last_total(&self) -> Option<u64> {
        self.last_total
    }

    /// React to the view's filter being set to `signature`
    ///
    /// A different signature resets `selection` unconditionally.
    pub fn observe_filter<Id: SelectionId>(
        &mut self,
        signature: FilterSignature,
        selection: &mut SelectionState<Id>,
    ) -> GuardEvent {
        if signature == self.signature {
            return GuardEvent::Unchanged;
        }

        let cleared = !selection.is_empty();
        if cleared {
            info!(
                mode = ?selection.mode(),
                "filter changed, clearing selection"
            );
        }
        selection.select_none();
        self.signature = signature;
        self.last_total = None;
        GuardEvent::FilterChanged { cleared }
    }

    /// React to a new authoritative total for the current filter
    pub fn observe_total<Id: SelectionId>(
        &mut self,
        total: u64,
        selection: &SelectionState<Id>,
    ) -> GuardEvent {
        let previous = self.last_total.replace(total);
        let event = match previous {
            None => GuardEvent::TotalObserved { total },
            Some(from) if total > from => GuardEvent::TotalGrew { from, to: total },
            Some(from) if total < from => GuardEvent::TotalShrank { from, to: total },
            Some(_) => GuardEvent::Unchanged,
        };

        if selection.mode() == SelectionMode::All
            && matches!(
                event,
                GuardEvent::TotalGrew { .. } | GuardEvent::TotalShrank { .. }
            )
        {
            debug!(
                ?event,
                selected = selection.selected_count(total),
                "collection size changed under select-all"
            );
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Filter {
        run: Option<&'static str>,
    }

    fn sig(run: Option<&'static str>) -> FilterSignature {
        FilterSignature::of(&Filter { run }).unwrap()
    }

    #[test]
    fn test_signature_is_stable() {
        assert_eq!(sig(Some("r1")), sig(Some("r1")));
        assert_ne!(sig(Some("r1")), sig(Some("r2")));
        assert_ne!(sig(None), sig(Some("r1")));
    }

    #[test]
    fn test_filter_change_clears_manual_selection() {
        let mut guard = ConsistencyGuard::new(sig(Some("r1")));
        let mut sel = SelectionState::new();
        sel.toggle_item("a".to_string());
        sel.toggle_item("b".to_string());

        let event = guard.observe_filter(sig(Some("r2")), &mut sel);
        assert_eq!(event, GuardEvent::FilterChanged { cleared: true });
        assert_eq!(sel.mode(), SelectionMode::None);
        assert!(sel.selected_ids().is_none());
        assert!(sel.deselected_ids().is_none());
    }

    #[test]
    fn test_filter_change_with_empty_selection() {
        let mut guard = ConsistencyGuard::new(sig(None));
        let mut sel: SelectionState<String> = SelectionState::new();
        let event = guard.observe_filter(sig(Some("r1")), &mut sel);
        assert_eq!(event, GuardEvent::FilterChanged { cleared: false });
        assert_eq!(guard.signature(), &sig(Some("r1")));
    }

    #[test]
    fn test_same_filter_keeps_selection() {
        let mut guard = ConsistencyGuard::new(sig(Some("r1")));
        let mut sel = SelectionState::new();
        sel.select_all();
        sel.toggle_item("x".to_string());

        assert_eq!(guard.observe_filter(sig(Some("r1")), &mut sel), GuardEvent::Unchanged);
        assert_eq!(sel.mode(), SelectionMode::All);
        assert!(!sel.is_selected(&"x".to_string()));
    }

    #[test]
    fn test_total_changes_never_reset_select_all() {
        let mut guard = ConsistencyGuard::new(sig(None));
        let mut sel = SelectionState::new();
        sel.select_all();
        sel.toggle_item("x".to_string());

        assert_eq!(guard.observe_total(10, &sel), GuardEvent::TotalObserved { total: 10 });
        assert_eq!(sel.selected_count(10), 9);

        assert_eq!(guard.observe_total(6, &sel), GuardEvent::TotalShrank { from: 10, to: 6 });
        assert_eq!(sel.mode(), SelectionMode::All);
        assert_eq!(sel.selected_count(6), 5);

        assert_eq!(guard.observe_total(20, &sel), GuardEvent::TotalGrew { from: 6, to: 20 });
        assert_eq!(sel.selected_count(20), 19);
        assert_eq!(guard.observe_total(20, &sel), GuardEvent::Unchanged);
    }

    #[test]
    fn test_filter_change_forgets_total() {
        let mut guard = ConsistencyGuard::new(sig(None));
        let mut sel: SelectionState<String> = SelectionState::new();
        guard.observe_total(40, &sel);
        guard.observe_filter(sig(Some("r9")), &mut sel);
        assert_eq!(guard.last_total(), None);
        assert_eq!(guard.observe_total(3, &sel), GuardEvent::TotalObserved { total: 3 });
    }
}
