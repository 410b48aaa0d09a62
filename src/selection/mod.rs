//! Cross-page selection
//!
//! - [`SelectionState`]: which records are selected, including the complement
//!   form used for "select all"
//! - [`SelectionPayload`]: the descriptor handed to bulk mutations

pub mod payload;
pub mod state;

pub use payload::{PayloadMode, SelectionPayload};
pub use state::{HeaderCheckbox, SelectionId, SelectionMode, SelectionState};
