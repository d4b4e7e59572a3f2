//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Process health (fast, no store access)
//! - `/readyz` - Readiness probe (round trip to the store)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[utoipa::path(get, path = "/livez", tag = "health", responses((status = 200, description = "Process is up")))]
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Process health.
#[utoipa::path(get, path = "/healthz", tag = "health", responses((status = 200, description = "Process is healthy", body = HealthResponse)))]
#[axum::debug_handler]
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /readyz - Readiness probe.
///
/// Returns 200 when the store answers a trivial query, 503 otherwise.
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse),
    )
)]
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Response {
    match state.todo_repo.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::ok())).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            ErrorResponse::new(StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
