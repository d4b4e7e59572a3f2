use std::{any::Any, time::Duration};

use axum::{
    body::{Body, HttpBody},
    http::{self, header, HeaderName, Method, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{OnResponse, TraceLayer},
};

use crate::{
    config::Config,
    handlers::{
        health::{healthz, livez, readyz},
        openapi::{openapi_json, swagger_ui, OPENAPI_PATH},
        todos::{create_todo, delete_todo, get_todo, list_todos, update_todo},
        ErrorResponse,
    },
    state::AppState,
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Path of the Swagger UI page.
pub const DOCS_PATH: &str = "/docs";

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, config: &Config) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER]);

    // API routes with CORS
    let api_routes = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(cors);

    // Innermost layer first: the request id is set before the trace span opens
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(OPENAPI_PATH, get(openapi_json))
        .route(DOCS_PATH, get(swagger_ui))
        .nest("/api/v1", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(RequestLogger)
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .with_state(state)
}

fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Logs one "request completed" event per response.
///
/// Level follows the status class: error for 5xx, warn for 4xx, info otherwise.
#[derive(Debug, Clone, Copy)]
struct RequestLogger;

impl<B: HttpBody> OnResponse<B> for RequestLogger {
    fn on_response(self, response: &http::Response<B>, latency: Duration, _: &tracing::Span) {
        let status = response.status().as_u16();
        let duration_ms = latency.as_millis() as u64;
        let bytes = response.body().size_hint().exact().unwrap_or_else(|| {
            response
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok()?.parse().ok())
                .unwrap_or(0)
        });

        if response.status().is_server_error() {
            tracing::error!(status, duration_ms, bytes, "request completed");
        } else if response.status().is_client_error() {
            tracing::warn!(status, duration_ms, bytes, "request completed");
        } else {
            tracing::info!(status, duration_ms, bytes, "request completed");
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "handler panicked");

    ErrorResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "an unexpected error occurred",
    )
    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}
