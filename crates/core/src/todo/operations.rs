use super::error::TodoError;
use super::requests::{CreateTodoRequest, UpdateTodoRequest};

/// Upper bound for `progress_percent`.
pub const MAX_PROGRESS_PERCENT: i64 = 100;

/// Validates a create request before it reaches the repository.
pub fn validate_create(request: &CreateTodoRequest) -> Result<(), TodoError> {
    validate_title(&request.title)?;
    if let Some(progress) = request.progress_percent {
        validate_progress(progress)?;
    }
    Ok(())
}

/// Validates a partial update. Only supplied fields are checked.
pub fn validate_update(request: &UpdateTodoRequest) -> Result<(), TodoError> {
    if let Some(title) = &request.title {
        validate_title(title)?;
    }
    if let Some(progress) = request.progress_percent {
        validate_progress(progress)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), TodoError> {
    if title.trim().is_empty() {
        return Err(TodoError::EmptyTitle);
    }
    Ok(())
}

fn validate_progress(progress: i64) -> Result<(), TodoError> {
    if !(0..=MAX_PROGRESS_PERCENT).contains(&progress) {
        return Err(TodoError::InvalidProgress(progress));
    }
    Ok(())
}
