//! List view session
//!
//! A [`ListView`] is everything one open, filtered list screen owns: the
//! accumulated rows, the selection over them, and the guard tying the two to
//! the active filter.
//!
//! # Workflow
//!
//! ```text
//! ListView::open(source, filter)
//!     ↓ first page
//! ┌─→ user action
//! │   ├─ scroll       → load_more()     → append (same generation)
//! │   ├─ new filter   → set_filter()    → guard clears selection → refetch
//! │   ├─ checkbox     → toggle_item() / select_visible() / select_all()
//! │   └─ bulk action  → submit(mutation) → payload + filter snapshot
//! └───┘
//! ```
//!
//! Fetches run synchronously through the owned source by default. Callers
//! that fetch elsewhere (another thread, an async task) use
//! [`ListView::request_more`], [`ListView::request_filter`] or
//! [`ListView::request_refetch`] to obtain a ticket and [`ListView::complete`]
//! to hand the result back.

use super::bulk::{BulkMutation, BulkOutcome};
use super::error::ViewError;
use super::guard::{ConsistencyGuard, FilterSignature, GuardEvent};
use crate::pagination::{
    Accumulator, AppendOutcome, CollectionPage, Keyed, PageRequest, PageSource,
};
use crate::selection::{
    HeaderCheckbox, SelectionId, SelectionMode, SelectionPayload, SelectionState,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Identifier type of the rows a source yields
pub type RowKey<S> = <<S as PageSource>::Item as Keyed>::Key;

type Result<T, E> = std::result::Result<T, ViewError<E>>;

/// One open, filtered list with bulk selection
pub struct ListView<'a, S>
where
    S: PageSource,
    S::Item: Keyed,
    RowKey<S>: SelectionId,
{
    source: &'a S,
    rows: Accumulator<S::Item, S::Filter>,
    selection: SelectionState<RowKey<S>>,
    guard: ConsistencyGuard,
}

impl<'a, S> ListView<'a, S>
where
    S: PageSource,
    S::Item: Keyed,
    RowKey<S>: SelectionId,
    S::Filter: Serialize,
{
    /// Open a view over `source` and fetch its first page
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Signature` if the filter cannot be fingerprinted
    /// and `ViewError::Fetch` if the first page cannot be loaded. The fetch
    /// failure is also recorded on the view, but the view itself is dropped.
    pub fn open(source: &'a S, filter: S::Filter, page_size: usize) -> Result<Self, S::Error> {
        let mut view = Self::idle(source, filter, page_size)?;
        view.load_more()?;
        Ok(view)
    }

    /// Create a view without fetching anything
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Signature` if the filter cannot be fingerprinted.
    pub fn idle(source: &'a S, filter: S::Filter, page_size: usize) -> Result<Self, S::Error> {
        let signature = FilterSignature::of(&filter)?;
        Ok(Self {
            source,
            rows: Accumulator::new(filter, page_size),
            selection: SelectionState::new(),
            guard: ConsistencyGuard::new(signature),
        })
    }

    /// Fetch and merge the next page
    ///
    /// Returns `Ok(None)` when there is nothing more to load or a fetch is
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Fetch` when the source fails. Rows loaded so far
    /// are kept and the error flag is set.
    pub fn load_more(&mut self) -> Result<Option<AppendOutcome>, S::Error> {
        let Some(request) = self.request_more() else {
            return Ok(None);
        };
        let result = self.source.fetch_request(&request);
        self.complete(request.generation, result).map(Some)
    }

    /// Keep loading until the feed is exhausted or `max_pages` were merged
    ///
    /// # Errors
    ///
    /// Stops at the first failing page and returns its error.
    pub fn load_pages(&mut self, max_pages: usize) -> Result<usize, S::Error> {
        let mut loaded = 0;
        while loaded < max_pages {
            match self.load_more()? {
                Some(AppendOutcome::Applied { .. }) => loaded += 1,
                Some(AppendOutcome::Stale) | None => break,
            }
        }
        Ok(loaded)
    }

    /// Switch to `filter`
    ///
    /// A different filter clears the selection and restarts pagination with
    /// a new generation. Returns `false` when the filter is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Fetch` if the new first page cannot be loaded;
    /// the view is then empty with its error flag set.
    pub fn set_filter(&mut self, filter: S::Filter) -> Result<bool, S::Error> {
        let Some(request) = self.request_filter(filter)? else {
            return Ok(false);
        };
        let result = self.source.fetch_request(&request);
        self.complete(request.generation, result)?;
        Ok(true)
    }

    /// Switch to `filter` and return the first-page ticket instead of fetching
    ///
    /// Returns `Ok(None)` when the filter is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Signature` if the filter cannot be fingerprinted.
    pub fn request_filter(
        &mut self,
        filter: S::Filter,
    ) -> Result<Option<PageRequest<S::Filter>>, S::Error> {
        let signature = FilterSignature::of(&filter)?;
        match self.guard.observe_filter(signature, &mut self.selection) {
            GuardEvent::Unchanged => Ok(None),
            event => {
                debug!(?event, "filter signature changed");
                Ok(Some(self.rows.refetch(filter)))
            }
        }
    }

    /// Reload from the first page under the current filter
    ///
    /// The selection survives since the filter did not change.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Fetch` if the first page cannot be loaded.
    pub fn refresh(&mut self) -> Result<AppendOutcome, S::Error> {
        let request = self.request_refetch();
        let result = self.source.fetch_request(&request);
        self.complete(request.generation, result)
    }

    /// Ticket for the next page, for callers that fetch on their own
    pub fn request_more(&mut self) -> Option<PageRequest<S::Filter>> {
        self.rows.load_more()
    }

    /// Ticket for a first page under the current filter
    pub fn request_refetch(&mut self) -> PageRequest<S::Filter> {
        let filter = self.rows.filter().clone();
        self.rows.refetch(filter)
    }

    /// Hand back the result of a ticket issued under `generation`
    ///
    /// Results from superseded generations are dropped, including errors.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Fetch` when `result` is a current-generation
    /// failure.
    pub fn complete(
        &mut self,
        generation: u64,
        result: std::result::Result<CollectionPage<S::Item>, S::Error>,
    ) -> Result<AppendOutcome, S::Error> {
        match result {
            Ok(page) => {
                let outcome = self.rows.append_page(page, generation);
                if outcome != AppendOutcome::Stale {
                    self.guard
                        .observe_total(self.rows.total_count(), &self.selection);
                }
                Ok(outcome)
            }
            Err(e) => {
                if self.rows.fail(generation) {
                    warn!(generation, error = %e, "page fetch failed");
                    Err(ViewError::Fetch(e))
                } else {
                    Ok(AppendOutcome::Stale)
                }
            }
        }
    }

    /// Submit a bulk action over the current selection
    ///
    /// The mutation receives the payload and a snapshot of the active
    /// filter. Nothing is refetched afterwards; call
    /// [`ListView::refresh`] if the rows should reflect the result.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::EmptySelection` when nothing is selected and
    /// `ViewError::Mutation` when the mutation fails as a whole.
    pub fn submit<M>(&self, mutation: &M) -> Result<BulkOutcome, M::Error>
    where
        M: BulkMutation<RowKey<S>, S::Filter>,
    {
        let payload = self.payload();
        if payload.is_empty() {
            return Err(ViewError::EmptySelection);
        }

        info!(
            mode = ?payload.mode,
            selected = payload.selected_ids.len(),
            excluded = payload.deselected_ids.len(),
            estimated = self.selected_count(),
            "submitting bulk mutation"
        );
        let outcome = mutation
            .apply(&payload, self.rows.filter())
            .map_err(ViewError::Mutation)?;
        info!(
            created = outcome.created_count,
            skipped = outcome.skipped_count,
            errors = outcome.error_count,
            "bulk mutation finished"
        );
        Ok(outcome)
    }
}

impl<S> ListView<'_, S>
where
    S: PageSource,
    S::Item: Keyed,
    RowKey<S>: SelectionId,
{
    /// Flip one row
    pub fn toggle_item(&mut self, id: RowKey<S>) {
        self.selection.toggle_item(id);
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Select exactly `ids`
    pub fn select_page<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RowKey<S>>,
    {
        self.selection.select_page(ids);
    }

    /// Select every row currently rendered
    pub fn select_visible(&mut self) {
        let ids: Vec<RowKey<S>> = self.rows.keys().cloned().collect();
        self.selection.select_page(ids);
    }

    /// Select every record matching the filter, loaded or not
    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    #[must_use]
    pub fn is_selected(&self, id: &RowKey<S>) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected count against the latest authoritative total
    #[must_use]
    pub fn selected_count(&self) -> u64 {
        self.selection.selected_count(self.rows.total_count())
    }

    /// Header checkbox state for the rows currently rendered
    #[must_use]
    pub fn header_state(&self) -> HeaderCheckbox {
        let visible: Vec<RowKey<S>> = self.rows.keys().cloned().collect();
        self.selection.header_state(&visible)
    }

    #[must_use]
    pub fn payload(&self) -> SelectionPayload<RowKey<S>> {
        self.selection.payload()
    }

    #[must_use]
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState<RowKey<S>> {
        &self.selection
    }

    /// Rows in display order
    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        self.rows.items()
    }

    #[must_use]
    pub const fn filter(&self) -> &S::Filter {
        self.rows.filter()
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.rows.total_count()
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.rows.has_next_page()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.rows.is_loading()
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.rows.has_error()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.rows.generation()
    }
}
