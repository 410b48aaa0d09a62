//! Page, cursor and request types shared by sources and the accumulator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token handed out by a paginated source
///
/// Only the source that issued a cursor can interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page returned by a paginated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPage<T> {
    /// Items in source order
    pub items: Vec<T>,
    /// Cursor for the following page, if any
    pub next_cursor: Option<Cursor>,
    pub has_next_page: bool,
    /// Total number of records matching the filter at fetch time
    pub total_count: u64,
}

/// Items that can be deduplicated by identity
pub trait Keyed {
    type Key: Clone + Eq + std::hash::Hash + std::fmt::Debug;

    /// Stable identity of this item
    fn key(&self) -> &Self::Key;
}

/// A fetch the accumulator wants performed
///
/// The ticket carries everything the fetcher needs plus the generation the
/// result must be reported back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub filter: F,
    /// `None` requests the first page
    pub cursor: Option<Cursor>,
    pub page_size: usize,
    pub generation: u64,
}

impl<F> PageRequest<F> {
    /// Whether this request is for the first page of its generation
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }
}

/// What happened to a page handed back to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Page belonged to the current generation and was merged
    Applied {
        /// Items that were new to the view
        added: usize,
        /// Items that replaced an existing entry with the same key
        replaced: usize,
    },
    /// Page belonged to a superseded generation and was dropped
    Stale,
}
