//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are always produced and formatted by SQLite
//! itself as ISO-8601 UTC text with millisecond precision.

/// Name of the only table.
pub const TODOS_TABLE: &str = "todos";

/// Base schema: the original column set plus the status index.
///
/// Columns added later are not listed here; they are applied by the
/// additive steps in `migrations`.
pub const CREATE_TODOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    title            TEXT    NOT NULL,
    description      TEXT    NOT NULL DEFAULT '',
    status           TEXT    NOT NULL DEFAULT 'pending' CHECK(status IN ('pending', 'in_progress', 'done')),
    progress_percent INTEGER NOT NULL DEFAULT 0 CHECK(progress_percent >= 0 AND progress_percent <= 100),
    created_at       TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at       TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_todos_status ON todos(status);
"#;

/// Lists the column names of a table.
pub const SELECT_TABLE_COLUMNS: &str = "SELECT name FROM pragma_table_info(?1)";

pub const INSERT_TODO: &str = r#"
INSERT INTO todos (title, description, status, category, progress_percent)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_TODO_BY_ID: &str = r#"
SELECT id, title, description, status, category, progress_percent,
       strftime('%Y-%m-%dT%H:%M:%fZ', created_at),
       strftime('%Y-%m-%dT%H:%M:%fZ', updated_at)
FROM todos
WHERE id = ?1
"#;

/// Select without predicates; filters and ordering are appended by the
/// clause builder.
pub const SELECT_TODOS: &str = r#"
SELECT id, title, description, status, category, progress_percent,
       strftime('%Y-%m-%dT%H:%M:%fZ', created_at),
       strftime('%Y-%m-%dT%H:%M:%fZ', updated_at)
FROM todos"#;

pub const ORDER_BY_ID: &str = "ORDER BY id ASC";

/// Assignment appended to every non-empty update.
pub const TOUCH_UPDATED_AT: &str = "updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub const DELETE_TODO: &str = r#"
DELETE FROM todos
WHERE id = ?1
"#;

pub const HEALTH_CHECK: &str = "SELECT 1";
