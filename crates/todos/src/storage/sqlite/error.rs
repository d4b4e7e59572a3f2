//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `todos_core::storage`, keeping the name of the failed operation.

use todos_core::storage::RepositoryError;

/// Entity name used in `NotFound` errors.
pub const TODO_ENTITY: &str = "todo";

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - Connection errors → `RepositoryError::ConnectionFailed`
/// - All other errors, including CHECK violations and an unexpected
///   `QueryReturnedNoRows` → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, operation: &'static str) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        _ => RepositoryError::QueryFailed {
            operation,
            message: err.to_string(),
        },
    }
}

/// Maps a rusqlite error for an operation targeting a known todo ID.
///
/// `QueryReturnedNoRows` means the row is absent and becomes `NotFound`.
fn map_rusqlite_error_with_id(
    err: &rusqlite::Error,
    operation: &'static str,
    id: i64,
) -> RepositoryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type: TODO_ENTITY,
            id,
        },

        _ => map_rusqlite_error(err, operation),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    operation: &'static str,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err, operation),
        tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed".to_string())
        }
        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed {
            operation,
            message: err.to_string(),
        },
    }
}

/// Maps a tokio_rusqlite error for an operation targeting a known todo ID.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    operation: &'static str,
    id: i64,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error_with_id(rusqlite_err, operation, id)
        }
        _ => map_tokio_rusqlite_error(err, operation),
    }
}
