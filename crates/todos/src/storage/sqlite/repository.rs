//! SQLite repository implementation.
//!
//! Implements `TodoRepository` from `todos_core::storage` on a single SQLite
//! connection. `tokio_rusqlite` runs that connection on a dedicated thread and
//! queues every call, so all writes are serialized process-wide.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use rusqlite::params_from_iter;
use thiserror::Error;
use tokio_rusqlite::Connection;

use todos_core::storage::{RepositoryError, Result, TodoFilter, TodoRepository};
use todos_core::todo::{CreateTodoRequest, Todo, UpdateTodoRequest};

use super::clauses::{list_statement, update_statement, Statement};
use super::conversions::row_to_todo;
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::migrations::run_migrations;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite journal modes accepted by `PRAGMA journal_mode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    #[default]
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "delete",
            JournalMode::Truncate => "truncate",
            JournalMode::Persist => "persist",
            JournalMode::Memory => "memory",
            JournalMode::Wal => "wal",
            JournalMode::Off => "off",
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown journal mode: {0}")]
pub struct UnknownJournalMode(pub String);

impl FromStr for JournalMode {
    type Err = UnknownJournalMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delete" => Ok(JournalMode::Delete),
            "truncate" => Ok(JournalMode::Truncate),
            "persist" => Ok(JournalMode::Persist),
            "memory" => Ok(JournalMode::Memory),
            "wal" => Ok(JournalMode::Wal),
            "off" => Ok(JournalMode::Off),
            _ => Err(UnknownJournalMode(s.to_string())),
        }
    }
}

/// Where and how to open the database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub path: PathBuf,
    pub journal_mode: JournalMode,
}

impl SqliteOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            journal_mode: JournalMode::default(),
        }
    }

    pub fn with_journal_mode(mut self, journal_mode: JournalMode) -> Self {
        self.journal_mode = journal_mode;
        self
    }
}

/// SQLite-based todo repository.
///
/// A value of this type only exists once the schema is fully migrated.
pub struct SqliteTodoRepository {
    conn: Connection,
}

impl SqliteTodoRepository {
    /// Opens (creating if needed) the database file and migrates it.
    ///
    /// Missing parent directories are created.
    pub async fn open(options: &SqliteOptions) -> Result<Self> {
        if let Some(parent) = options
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RepositoryError::ConnectionFailed(format!(
                    "Cannot create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(options.path.clone())
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let repo = Self::from_connection(conn, options.journal_mode).await?;

        tracing::info!(path = %options.path.display(), "database initialized");
        Ok(repo)
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is closed.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn, JournalMode::Memory).await
    }

    /// Wraps an already opened connection: applies the journal mode, then
    /// migrates. Fails without returning a repository if either step fails.
    pub async fn from_connection(conn: Connection, journal_mode: JournalMode) -> Result<Self> {
        Self::configure(&conn, journal_mode).await?;
        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn configure(conn: &Connection, journal_mode: JournalMode) -> Result<()> {
        let active = conn
            .call(move |conn| {
                conn.pragma_update_and_check(None, "journal_mode", journal_mode.as_str(), |row| {
                    row.get::<_, String>(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "set journal mode"))?;

        tracing::info!(requested = %journal_mode, active = %active, "journal mode configured");
        Ok(())
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        let migrated = conn
            .call(|conn| Ok(run_migrations(conn)))
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        migrated
            .map(|_| ())
            .map_err(|e| RepositoryError::Migration(e.to_string()))
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn create_todo(&self, request: CreateTodoRequest) -> Result<Todo> {
        let CreateTodoRequest {
            title,
            description,
            status,
            category,
            progress_percent,
        } = request;
        let status = status.unwrap_or_default();
        let category = category.unwrap_or_default();
        let progress_percent = progress_percent.unwrap_or(0);

        let todo = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TODO,
                    rusqlite::params![
                        title,
                        description,
                        status.as_str(),
                        category.as_str(),
                        progress_percent
                    ],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();

                // Re-read so the caller sees exactly what the store computed
                conn.query_row(schema::SELECT_TODO_BY_ID, [id], row_to_todo)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "create todo"))?;

        tracing::debug!(todo_id = todo.id, title = %todo.title, "Created todo");
        Ok(todo)
    }

    async fn get_todo(&self, id: i64) -> Result<Todo> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_TODO_BY_ID, [id], row_to_todo)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "get todo", id))
    }

    async fn list_todos(&self, filter: TodoFilter) -> Result<Vec<Todo>> {
        let Statement { sql, params } = list_statement(&filter);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params), row_to_todo)
                    .map_err(wrap_err)?;

                let mut todos = Vec::new();
                for row_result in rows {
                    todos.push(row_result.map_err(wrap_err)?);
                }
                Ok(todos)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "list todos"))
    }

    async fn update_todo(&self, id: i64, request: UpdateTodoRequest) -> Result<Todo> {
        let Some(Statement { sql, params }) = update_statement(id, &request) else {
            // Nothing to write: updated_at must not move
            return self.get_todo(id).await;
        };

        let todo = self
            .conn
            .call(move |conn| {
                let rows = conn
                    .execute(&sql, params_from_iter(params))
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }

                conn.query_row(schema::SELECT_TODO_BY_ID, [id], row_to_todo)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "update todo", id))?;

        tracing::debug!(todo_id = id, "Updated todo");
        Ok(todo)
    }

    async fn delete_todo(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_TODO, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "delete todo", id))?;

        tracing::debug!(todo_id = id, "Deleted todo");
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::HEALTH_CHECK, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|_| ())
            .map_err(|e| map_tokio_rusqlite_error(e, "health check"))
    }

    async fn close(&self) -> Result<()> {
        self.conn
            .clone()
            .close()
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "close connection"))?;

        tracing::info!("database connection closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use todos_core::todo::{Category, Status};

    async fn repo() -> SqliteTodoRepository {
        SqliteTodoRepository::new_in_memory().await.unwrap()
    }

    /// Timestamps have millisecond resolution; make sure the clock moves.
    async fn tick() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let repo = repo().await;

        let created = repo
            .create_todo(CreateTodoRequest::new("Buy milk"))
            .await
            .unwrap();
        let fetched = repo.get_todo(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.description, "");
        assert_eq!(fetched.status, Status::Pending);
        assert_eq!(fetched.category, Category::Personal);
        assert_eq!(fetched.progress_percent, 0);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_ne!(fetched.created_at, chrono::DateTime::<chrono::Utc>::default());
    }

    #[tokio::test]
    async fn test_create_with_all_fields() {
        let repo = repo().await;
        let request = CreateTodoRequest::new("Quarterly report")
            .with_description("Numbers for Q3")
            .with_status(Status::InProgress)
            .with_category(Category::Work)
            .with_progress(30);

        let todo = repo.create_todo(request).await.unwrap();

        assert_eq!(todo.description, "Numbers for Q3");
        assert_eq!(todo.status, Status::InProgress);
        assert_eq!(todo.category, Category::Work);
        assert_eq!(todo.progress_percent, 30);
    }

    #[tokio::test]
    async fn test_create_out_of_range_progress_is_rejected_by_store() {
        let repo = repo().await;

        let result = repo
            .create_todo(CreateTodoRequest::new("x").with_progress(101))
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::QueryFailed {
                operation: "create todo",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_partial_update_preserves_untouched_fields() {
        let repo = repo().await;
        let created = repo
            .create_todo(CreateTodoRequest::new("Read book").with_description("Chapter 1"))
            .await
            .unwrap();
        tick().await;

        let updated = repo
            .update_todo(created.id, UpdateTodoRequest::new().with_progress(50))
            .await
            .unwrap();
        let fetched = repo.get_todo(created.id).await.unwrap();

        assert_eq!(updated, fetched);
        assert_eq!(fetched.progress_percent, 50);
        assert_eq!(fetched.title, "Read book");
        assert_eq!(fetched.description, "Chapter 1");
        assert_eq!(fetched.status, Status::Pending);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at > fetched.created_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_text_fields() {
        let repo = repo().await;
        let created = repo
            .create_todo(CreateTodoRequest::new("Call mom").with_description("Sunday"))
            .await
            .unwrap();

        let updated = repo
            .update_todo(created.id, UpdateTodoRequest::new().with_description(""))
            .await
            .unwrap();

        assert_eq!(updated.description, "");
        assert_eq!(updated.title, "Call mom");
    }

    #[tokio::test]
    async fn test_empty_update_is_a_reread() {
        let repo = repo().await;
        let created = repo
            .create_todo(CreateTodoRequest::new("Water plants"))
            .await
            .unwrap();
        tick().await;

        let unchanged = repo
            .update_todo(created.id, UpdateTodoRequest::new())
            .await
            .unwrap();

        assert_eq!(unchanged, created);
        assert_eq!(unchanged.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let repo = repo().await;
        let expected = RepositoryError::NotFound {
            entity_type: "todo",
            id: 999_999,
        };

        assert_eq!(repo.get_todo(999_999).await.unwrap_err(), expected);
        assert_eq!(
            repo.update_todo(999_999, UpdateTodoRequest::new().with_title("x"))
                .await
                .unwrap_err(),
            expected
        );
        assert_eq!(
            repo.update_todo(999_999, UpdateTodoRequest::new())
                .await
                .unwrap_err(),
            expected
        );
        assert_eq!(repo.delete_todo(999_999).await.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn test_filter_composition() {
        let repo = repo().await;
        let work = repo
            .create_todo(CreateTodoRequest::new("Deploy").with_category(Category::Work))
            .await
            .unwrap();
        let groceries = repo
            .create_todo(CreateTodoRequest::new("Groceries"))
            .await
            .unwrap();
        let gym = repo
            .create_todo(CreateTodoRequest::new("Gym").with_status(Status::Done))
            .await
            .unwrap();

        let both = repo
            .list_todos(
                TodoFilter::new()
                    .with_status(Status::Pending)
                    .with_category(Category::Personal),
            )
            .await
            .unwrap();
        assert_eq!(both, vec![groceries.clone()]);

        let pending = repo
            .list_todos(TodoFilter::new().with_status(Status::Pending))
            .await
            .unwrap();
        assert_eq!(pending, vec![work.clone(), groceries.clone()]);

        let personal = repo
            .list_todos(TodoFilter::new().with_category(Category::Personal))
            .await
            .unwrap();
        assert_eq!(personal, vec![groceries.clone(), gym.clone()]);

        let all = repo.list_todos(TodoFilter::new()).await.unwrap();
        assert_eq!(all, vec![work, groceries, gym]);
    }

    #[tokio::test]
    async fn test_list_empty_table() {
        let repo = repo().await;

        let todos = repo.list_todos(TodoFilter::new()).await.unwrap();

        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_reread_and_ids_not_reused() {
        let repo = repo().await;
        let first = repo.create_todo(CreateTodoRequest::new("a")).await.unwrap();
        let second = repo.create_todo(CreateTodoRequest::new("b")).await.unwrap();

        repo.delete_todo(second.id).await.unwrap();

        assert!(repo.get_todo(second.id).await.unwrap_err().is_not_found());
        assert!(repo.delete_todo(second.id).await.unwrap_err().is_not_found());

        let third = repo.create_todo(CreateTodoRequest::new("c")).await.unwrap();
        assert!(third.id > second.id);
        assert_ne!(third.id, first.id);
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = repo().await;
        assert!(repo.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_close_releases_connection() {
        let repo = repo().await;

        repo.close().await.unwrap();

        let err = repo.get_todo(1).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_from_connection_migrates_legacy_table() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TODOS_TABLE)
                .map_err(wrap_err)?;
            conn.execute(
                "INSERT INTO todos (title, status, progress_percent) VALUES ('Legacy', 'done', 80)",
                [],
            )
            .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .unwrap();

        let repo = SqliteTodoRepository::from_connection(conn, JournalMode::Memory)
            .await
            .unwrap();
        let todo = repo.get_todo(1).await.unwrap();

        assert_eq!(todo.title, "Legacy");
        assert_eq!(todo.status, Status::Done);
        assert_eq!(todo.progress_percent, 80);
        assert_eq!(todo.category, Category::Personal);
    }

    #[tokio::test]
    async fn test_from_connection_fails_closed_on_bad_schema() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| {
            conn.execute_batch("CREATE TABLE todos (id INTEGER PRIMARY KEY)")
                .map_err(wrap_err)
        })
        .await
        .unwrap();

        let result = SqliteTodoRepository::from_connection(conn, JournalMode::Memory).await;

        assert!(matches!(result, Err(RepositoryError::Migration(_))));
    }

    #[tokio::test]
    async fn test_open_file_database_uses_wal_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("todos.db");
        let options = SqliteOptions::new(&path);

        let repo = SqliteTodoRepository::open(&options).await.unwrap();
        let created = repo
            .create_todo(CreateTodoRequest::new("Persist me"))
            .await
            .unwrap();
        repo.close().await.unwrap();

        let raw = rusqlite::Connection::open(&path).unwrap();
        let mode: String = raw
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
        drop(raw);

        let reopened = SqliteTodoRepository::open(&options).await.unwrap();
        assert_eq!(reopened.get_todo(created.id).await.unwrap(), created);
        reopened.close().await.unwrap();
    }

    #[test]
    fn test_journal_mode_parsing() {
        assert_eq!("WAL".parse::<JournalMode>().unwrap(), JournalMode::Wal);
        assert_eq!(" delete ".parse::<JournalMode>().unwrap(), JournalMode::Delete);
        assert_eq!(
            "fast".parse::<JournalMode>(),
            Err(UnknownJournalMode("fast".to_string()))
        );
        assert_eq!(JournalMode::default().as_str(), "wal");
    }
}
