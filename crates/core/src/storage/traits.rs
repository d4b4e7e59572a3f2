use async_trait::async_trait;

use crate::todo::{CreateTodoRequest, Todo, UpdateTodoRequest};

use super::{Result, TodoFilter};

/// Repository for todo operations.
///
/// Every method is a single round trip to the store. Implementations never
/// retry; failures are returned immediately.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Inserts a new todo and returns it as stored.
    async fn create_todo(&self, request: CreateTodoRequest) -> Result<Todo>;

    /// Gets a todo by its ID.
    async fn get_todo(&self, id: i64) -> Result<Todo>;

    /// Lists todos matching the filter, ordered by ascending ID.
    async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>>;

    /// Applies the supplied fields to an existing todo and returns it.
    async fn update_todo(&self, id: i64, request: UpdateTodoRequest) -> Result<Todo>;

    /// Deletes a todo by its ID.
    async fn delete_todo(&self, id: i64) -> Result<()>;

    /// Verifies the store answers a trivial query.
    async fn health_check(&self) -> Result<()>;

    /// Releases the store connection. Call once, at shutdown.
    async fn close(&self) -> Result<()>;
}
