//! Processing journal.
//!
//! Append-only log of per-file outcomes. Each processed recording gets
//! exactly one row once it reaches a terminal state; rows are never
//! updated or deleted.

mod sqlite;
mod store;
mod types;

pub use sqlite::*;
pub use store::*;
pub use types::*;
