//! Filtered list views
//!
//! Composes the selection engine and the pagination accumulator into one
//! per-screen session, guarded against filter changes, and defines the bulk
//! mutation contract the selection is submitted to.

pub mod bulk;
pub mod error;
pub mod guard;
pub mod session;

pub use bulk::{BulkItemError, BulkMutation, BulkOutcome};
pub use error::ViewError;
pub use guard::{ConsistencyGuard, FilterSignature, GuardEvent};
pub use session::{ListView, RowKey};
