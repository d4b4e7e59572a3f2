//! Shared application state.

use std::sync::Arc;

use todos_core::storage::TodoRepository;

/// Shared application state.
///
/// This is cloned for each request handler; the repository itself is shared.
#[derive(Clone)]
pub struct AppState {
    /// Todo repository.
    pub todo_repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(todo_repo: Arc<dyn TodoRepository>) -> Self {
        Self { todo_repo }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a fresh in-memory SQLite store.
    pub async fn in_memory() -> Self {
        let repo = crate::storage::SqliteTodoRepository::new_in_memory()
            .await
            .expect("in-memory store should open");
        Self::new(Arc::new(repo))
    }
}
