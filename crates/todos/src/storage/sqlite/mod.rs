//! SQLite storage backend.
//!
//! A single connection behind `tokio_rusqlite`, migrated on open.

mod clauses;
mod conversions;
mod error;
mod migrations;
mod repository;
mod schema;

pub use repository::{JournalMode, SqliteOptions, SqliteTodoRepository};
