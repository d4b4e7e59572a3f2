//! Core for the todos service.
//!
//! Pure domain types, validation and storage contracts. Nothing in this crate
//! performs I/O; the SQLite backend and the HTTP layer live in the `todos`
//! binary crate.

pub mod serde;
pub mod storage;
pub mod todo;
