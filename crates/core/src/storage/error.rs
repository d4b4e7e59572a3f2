use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// `NotFound` is the only variant a caller is expected to handle; every other
/// variant is a persistence failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: i64 },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("{operation} failed: {message}")]
    QueryFailed {
        operation: &'static str,
        message: String,
    },
}

impl RepositoryError {
    /// Returns true if the targeted row does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }

    /// Returns true for failures of the underlying store.
    pub fn is_persistence(&self) -> bool {
        !self.is_not_found()
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
