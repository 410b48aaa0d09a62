//! Pagination accumulator
//!
//! Assembles successive pages of a cursor-paginated source into one
//! order-stable, deduplicated list.
//!
//! # Generations
//!
//! Every [`Accumulator::refetch`] starts a new generation. Tickets handed out
//! by [`Accumulator::load_more`] and [`Accumulator::refetch`] carry the
//! generation they were issued under, and results are only merged when that
//! generation is still current. A slow "load more" issued before a filter
//! change therefore lands on the floor instead of in the new view.
//!
//! ```text
//!   load_more() ──▶ PageRequest{gen: 3} ──▶ fetch (any thread) ──┐
//!   refetch(f)  ──▶ PageRequest{gen: 4} ──▶ fetch ───────────┐   │
//!                                                            ▼   ▼
//!                                    append_page(page, 4)   append_page(page, 3)
//!                                         merged                  Stale
//! ```
//!
//! There is no cancellation. In-flight requests always run to completion and
//! their results are discarded on arrival if stale.

use super::types::{AppendOutcome, CollectionPage, Cursor, Keyed, PageRequest};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Accumulated view over a cursor-paginated source
#[derive(Debug, Clone)]
pub struct Accumulator<T: Keyed, F> {
    filter: F,
    page_size: usize,
    items: Vec<T>,
    positions: HashMap<T::Key, usize>,
    cursor: Option<Cursor>,
    has_next_page: bool,
    total_count: u64,
    loading: bool,
    error: bool,
    generation: u64,
}

impl<T: Keyed, F: Clone> Accumulator<T, F> {
    /// Create an empty accumulator for `filter`
    ///
    /// Nothing is fetched until [`Accumulator::load_more`] is called.
    #[must_use]
    pub fn new(filter: F, page_size: usize) -> Self {
        Self {
            filter,
            page_size: page_size.max(1),
            items: Vec::new(),
            positions: HashMap::new(),
            cursor: None,
            has_next_page: true,
            total_count: 0,
            loading: false,
            error: false,
            generation: 0,
        }
    }

    /// Request the next page
    ///
    /// Returns `None` when there is nothing more to fetch or a fetch is
    /// already in flight. Concurrent calls are dropped, not queued.
    pub fn load_more(&mut self) -> Option<PageRequest<F>> {
        if !self.has_next_page || self.loading {
            return None;
        }
        self.loading = true;
        self.error = false;
        Some(self.ticket())
    }

    /// Merge a page fetched for `request_generation`
    ///
    /// Items whose key already exists replace the earlier entry in place;
    /// new items are appended in arrival order.
    pub fn append_page(
        &mut self,
        page: CollectionPage<T>,
        request_generation: u64,
    ) -> AppendOutcome {
        if request_generation != self.generation {
            debug!(
                stale = request_generation,
                current = self.generation,
                items = page.items.len(),
                "discarding page from superseded generation"
            );
            return AppendOutcome::Stale;
        }

        let mut added = 0;
        let mut replaced = 0;
        for item in page.items {
            if let Some(&pos) = self.positions.get(item.key()) {
                self.items[pos] = item;
                replaced += 1;
            } else {
                self.positions.insert(item.key().clone(), self.items.len());
                self.items.push(item);
                added += 1;
            }
        }

        if page.has_next_page && page.next_cursor.is_none() {
            warn!(
                generation = self.generation,
                "source reported more pages without a cursor; treating feed as complete"
            );
        }
        self.has_next_page = page.has_next_page && page.next_cursor.is_some();
        self.cursor = page.next_cursor;
        self.total_count = page.total_count;
        self.loading = false;
        self.error = false;

        debug!(
            generation = self.generation,
            added,
            replaced,
            total = self.total_count,
            "page merged"
        );
        AppendOutcome::Applied { added, replaced }
    }

    /// Record that the fetch issued for `request_generation` failed
    ///
    /// Returns `false` when the failure belongs to a superseded generation
    /// and was ignored. Accumulated items are never rolled back, so the same
    /// page can be retried with another [`Accumulator::load_more`].
    pub fn fail(&mut self, request_generation: u64) -> bool {
        if request_generation != self.generation {
            debug!(
                stale = request_generation,
                current = self.generation,
                "ignoring failure from superseded generation"
            );
            return false;
        }
        self.loading = false;
        self.error = true;
        true
    }

    /// Start over with `new_filter`
    ///
    /// Clears the view, starts a new generation and returns the ticket for
    /// its first page.
    pub fn refetch(&mut self, new_filter: F) -> PageRequest<F> {
        self.generation += 1;
        self.filter = new_filter;
        self.items.clear();
        self.positions.clear();
        self.cursor = None;
        self.has_next_page = true;
        self.total_count = 0;
        self.loading = true;
        self.error = false;
        debug!(generation = self.generation, "refetch started");
        self.ticket()
    }

    fn ticket(&self) -> PageRequest<F> {
        PageRequest {
            filter: self.filter.clone(),
            cursor: self.cursor.clone(),
            page_size: self.page_size,
            generation: self.generation,
        }
    }
}

impl<T: Keyed, F> Accumulator<T, F> {
    /// Accumulated items in arrival order
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Look up an accumulated item by key
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.positions.get(key).map(|&pos| &self.items[pos])
    }

    /// Keys of the accumulated items in display order
    pub fn keys(&self) -> impl Iterator<Item = &T::Key> + '_ {
        self.items.iter().map(Keyed::key)
    }

    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Total reported by the most recent page of the current generation
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the last fetch of the current generation failed
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
