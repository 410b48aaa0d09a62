//! Cursor-paginated accumulation
//!
//! - [`Accumulator`]: grows one deduplicated list from successive pages and
//!   drops results from superseded generations
//! - [`PageSource`]: the query capability pages come from

pub mod accumulator;
pub mod source;
pub mod types;

pub use accumulator::Accumulator;
pub use source::PageSource;
pub use types::{AppendOutcome, CollectionPage, Cursor, Keyed, PageRequest};
