mod error;
mod operations;
mod requests;
mod types;

pub use error::TodoError;
pub use operations::{validate_create, validate_update, MAX_PROGRESS_PERCENT};
pub use requests::{CreateTodoRequest, ListTodosQuery, TodoListResponse, UpdateTodoRequest};
pub use types::{Category, Status, Todo};
