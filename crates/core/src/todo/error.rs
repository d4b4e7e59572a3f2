use thiserror::Error;

/// Errors raised when validating todo payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("title is required")]
    EmptyTitle,
    #[error("progress_percent must be between 0 and 100, got {0}")]
    InvalidProgress(i64),
    #[error("status must be one of: pending, in_progress, done (got '{0}')")]
    InvalidStatus(String),
    #[error("category must be one of: personal, work, other (got '{0}')")]
    InvalidCategory(String),
}
