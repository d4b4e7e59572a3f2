//! Storage backends for the todo service.

pub mod sqlite;

pub use sqlite::{JournalMode, SqliteOptions, SqliteTodoRepository};
