//! Todo CRUD handlers.
//!
//! Requests are validated here; the repository trait object does the rest.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use todos_core::todo::{
    validate_create, validate_update, CreateTodoRequest, ListTodosQuery, Todo, TodoListResponse,
    UpdateTodoRequest,
};

use crate::{
    handlers::{AppError, ErrorResponse},
    state::AppState,
};

/// List todos (GET /api/v1/todos).
///
/// `status` and `category` narrow the result; empty values are ignored.
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    tag = "todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Todos matching the filters, by ascending id", body = TodoListResponse),
        (status = 400, description = "Unknown status or category", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> Result<Json<TodoListResponse>, AppError> {
    let Query(query) = query?;

    let todos = state.todo_repo.list_todos(query.into_filter()).await?;

    Ok(Json(TodoListResponse::from(todos)))
}

/// Create a new todo (POST /api/v1/todos).
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(payload) = payload?;
    validate_create(&payload)?;

    let todo = state.todo_repo.create_todo(payload).await?;

    tracing::info!(todo_id = todo.id, title = %todo.title, "Created new todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Get a single todo (GET /api/v1/todos/{id}).
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = Todo),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = id?;

    let todo = state.todo_repo.get_todo(id).await?;

    Ok(Json(todo))
}

/// Partially update a todo (PUT /api/v1/todos/{id}).
///
/// Only the fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "The updated todo", body = Todo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    validate_update(&payload)?;

    let todo = state.todo_repo.update_todo(id, payload).await?;

    tracing::info!(todo_id = id, "Updated todo");
    Ok(Json(todo))
}

/// Delete a todo (DELETE /api/v1/todos/{id}).
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "No todo with this id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    state.todo_repo.delete_todo(id).await?;

    tracing::info!(todo_id = id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
