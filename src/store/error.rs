//! Store-specific error types
//!
//! - **`SledError`**: errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode (de)serialization failures
//! - **`CsvError`**: unreadable CSV input during import
//! - **`InvalidPattern`**: a filter's search regex does not compile
//! - **`InvalidCursor`**: a cursor this store did not issue
//! - **`InvalidInput`**: malformed import rows and similar caller mistakes

use thiserror::Error;

/// Lead store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// CSV input could not be read
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Search pattern is not a valid regex
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Cursor was not issued by this store
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
