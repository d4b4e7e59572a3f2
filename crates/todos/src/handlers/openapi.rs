//! OpenAPI document and a Swagger UI page that renders it.

use axum::{response::Html, Json};
use utoipa::OpenApi;

use todos_core::todo::{
    Category, CreateTodoRequest, Status, Todo, TodoListResponse, UpdateTodoRequest,
};

use crate::handlers::{error::ErrorResponse, health, health::HealthResponse, todos};

/// Path the OpenAPI document is served under.
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        description = "CRUD service for todo items backed by SQLite"
    ),
    paths(
        todos::list_todos,
        todos::create_todo,
        todos::get_todo,
        todos::update_todo,
        todos::delete_todo,
        health::livez,
        health::healthz,
        health::readyz,
    ),
    components(schemas(
        Todo,
        Status,
        Category,
        CreateTodoRequest,
        UpdateTodoRequest,
        TodoListResponse,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "todos", description = "Todo management"),
        (name = "health", description = "Liveness and readiness checks"),
    )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /docs - Swagger UI pointed at [`OPENAPI_PATH`].
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Todo API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;
