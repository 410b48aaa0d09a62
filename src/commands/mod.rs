//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the lead store.

pub mod contacts;
pub mod convert;
pub mod import;
pub mod list;

// Re-export execute functions for convenience
pub use contacts::execute as contacts;
pub use convert::execute as convert;
pub use import::execute as import;
pub use list::execute as list;
