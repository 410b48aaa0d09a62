//! View-level error types
//!
//! Errors are generic over the collaborator that failed, so a view over a
//! remote API and a view over the embedded store report their own error
//! types unchanged.
//!
//! - **`Fetch`**: the page source failed; the accumulator's error flag is set
//! - **`Mutation`**: the bulk mutation could not run at all
//! - **`EmptySelection`**: a bulk action was submitted with nothing selected
//! - **`Signature`**: the filter could not be fingerprinted

use thiserror::Error;

/// Errors surfaced by [`ListView`](super::ListView)
#[derive(Debug, Error)]
pub enum ViewError<E> {
    /// Page source failed
    #[error("Failed to fetch page: {0}")]
    Fetch(#[source] E),

    /// Bulk mutation failed as a whole
    #[error("Bulk mutation failed: {0}")]
    Mutation(#[source] E),

    /// Nothing to act on
    #[error("No records selected")]
    EmptySelection,

    /// Filter could not be serialized into a signature
    #[error("Failed to compute filter signature: {0}")]
    Signature(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
