//! API request and response types for todo operations.
//!
//! Pure data types, shared by the HTTP layer and the storage backends.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::types::{Category, Status, Todo};
use crate::serde::deserialize_optional_enum;
use crate::storage::TodoFilter;

/// Request payload for creating a new todo.
///
/// Omitted fields receive the store defaults: `pending`, `personal`, 0%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(minimum = 0, maximum = 100)]
    pub progress_percent: Option<i64>,
}

impl CreateTodoRequest {
    /// Create a new request with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: None,
            category: None,
            progress_percent: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the initial progress.
    pub fn with_progress(mut self, progress_percent: i64) -> Self {
        self.progress_percent = Some(progress_percent);
        self
    }
}

/// Request payload for a partial update.
///
/// `None` means the field was not supplied and keeps its stored value.
/// `Some` always overwrites, even with an empty string or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(minimum = 0, maximum = 100)]
    pub progress_percent: Option<i64>,
}

impl UpdateTodoRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_progress(mut self, progress_percent: i64) -> Self {
        self.progress_percent = Some(progress_percent);
        self
    }

    /// Returns true when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.progress_percent.is_none()
    }
}

/// Query parameters for listing todos (GET /api/v1/todos).
///
/// Empty values (`?status=`) are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    #[serde(default, deserialize_with = "deserialize_optional_enum")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "deserialize_optional_enum")]
    pub category: Option<Category>,
}

impl ListTodosQuery {
    /// Converts the query into a storage filter.
    pub fn into_filter(self) -> TodoFilter {
        TodoFilter {
            status: self.status,
            category: self.category,
        }
    }
}

/// Response body for listing todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
    pub count: usize,
}

impl From<Vec<Todo>> for TodoListResponse {
    fn from(todos: Vec<Todo>) -> Self {
        let count = todos.len();
        Self { todos, count }
    }
}
