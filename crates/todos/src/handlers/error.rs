use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use todos_core::storage::{repository_error_to_status_code, RepositoryError};
use todos_core::todo::TodoError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Lower-case HTTP reason phrase, e.g. `not found`.
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: status
                .canonical_reason()
                .unwrap_or("error")
                .to_lowercase(),
            message: message.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Handler error wrapping `anyhow::Error`.
///
/// The status code is derived from the wrapped error type. Server errors are
/// logged and answered with a generic message.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let err = &self.0;

        if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, repo_error.to_string());
        }
        if let Some(todo_error) = err.downcast_ref::<TodoError>() {
            return (StatusCode::BAD_REQUEST, todo_error.to_string());
        }
        if let Some(rejection) = err.downcast_ref::<JsonRejection>() {
            let status = match rejection.status() {
                StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, rejection.body_text());
        }
        if let Some(rejection) = err.downcast_ref::<QueryRejection>() {
            return (StatusCode::BAD_REQUEST, rejection.body_text());
        }
        if let Some(rejection) = err.downcast_ref::<PathRejection>() {
            return (StatusCode::BAD_REQUEST, rejection.body_text());
        }

        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            "an unexpected error occurred".to_string()
        } else {
            tracing::warn!(status = %status, message = %message, "API error");
            message
        };

        ErrorResponse::new(status, message).into_response_with(status)
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::NotFound {
            entity_type: "todo",
            id: 42,
        });

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body.error, "not found");
        assert_eq!(body.message, "todo with id 42 not found");
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let response = AppError::from(TodoError::InvalidProgress(150)).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.error, "bad request");
        assert_eq!(
            body.message,
            "progress_percent must be between 0 and 100, got 150"
        );
    }

    #[tokio::test]
    async fn test_persistence_error_hides_details() {
        let err = AppError::from(RepositoryError::QueryFailed {
            operation: "list todos",
            message: "disk I/O error at /var/lib/todos.db".to_string(),
        });

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, "internal server error");
        assert!(!body.message.contains("/var/lib"));
    }

    #[tokio::test]
    async fn test_unknown_error_maps_to_500() {
        let response = AppError::from(anyhow::anyhow!("boom")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
