//! bulksel - cross-page selection and incremental pagination for bulk actions
//!
//! Lets a list screen select records across a large, server-paginated,
//! filterable collection without materializing every id, and grow one
//! deduplicated, order-stable list from a cursor-paginated feed while
//! surviving refetches and filter changes.
//!
//! - [`selection`]: selection state engine and its wire payload
//! - [`pagination`]: generation-guarded page accumulator
//! - [`view`]: per-screen session with the consistency guard and bulk contract
//! - [`store`]: sled-backed lead store serving pages and bulk conversion

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod pagination;
pub mod selection;
pub mod store;
pub mod view;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum BulkselError {
    /// Lead store error
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<view::ViewError<store::StoreError>> for BulkselError {
    fn from(error: view::ViewError<store::StoreError>) -> Self {
        match error {
            view::ViewError::Fetch(e) | view::ViewError::Mutation(e) => Self::Store(e),
            view::ViewError::EmptySelection => Self::InvalidInput("No leads selected".into()),
            view::ViewError::Signature(e) => Self::Json(e),
        }
    }
}
