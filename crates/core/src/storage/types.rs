use crate::todo::{Category, Status};

/// Optional predicates for listing todos.
///
/// Present predicates are combined with AND; an empty filter matches every
/// todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub status: Option<Status>,
    pub category: Option<Category>,
}

impl TodoFilter {
    /// Creates a filter that matches every todo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to one category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns true when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.category.is_none()
    }
}
