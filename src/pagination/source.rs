//! Paginated query capability
//!
//! Implemented by whatever actually runs queries (a remote API client, an
//! embedded store, a test fake). Retry and timeout policy live behind this
//! trait, not in the accumulator.

use super::types::{CollectionPage, Cursor, PageRequest};

/// A cursor-paginated, filterable collection
pub trait PageSource {
    type Item;
    type Filter: Clone;
    type Error: std::error::Error;

    /// Fetch one page
    ///
    /// `cursor` is `None` for the first page.
    ///
    /// # Errors
    ///
    /// Returns the source's error type when the query cannot be executed.
    fn fetch(
        &self,
        filter: &Self::Filter,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<CollectionPage<Self::Item>, Self::Error>;

    /// Execute a ticket handed out by an accumulator
    ///
    /// # Errors
    ///
    /// Propagates [`PageSource::fetch`] errors.
    fn fetch_request(
        &self,
        request: &PageRequest<Self::Filter>,
    ) -> Result<CollectionPage<Self::Item>, Self::Error> {
        self.fetch(&request.filter, request.cursor.as_ref(), request.page_size)
    }
}
