//! Schema setup and additive column migrations.
//!
//! The base table is created with `CREATE TABLE IF NOT EXISTS`. Columns added
//! afterwards are listed in [`COLUMN_MIGRATIONS`] and applied in order. The
//! live column catalog (`pragma_table_info`) is the ledger: a step whose column
//! already exists is skipped, so running the migrator is idempotent and needs
//! no version table.

use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use super::schema;

/// An additive step: add `column` to `table` unless it already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMigration {
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    /// Column type, default and constraints, as accepted by `ADD COLUMN`.
    pub definition: &'static str,
    /// Index supporting the new column, created in the same transaction.
    pub index: Option<&'static str>,
}

/// All column steps in application order. Append only.
pub const COLUMN_MIGRATIONS: &[ColumnMigration] = &[ColumnMigration {
    name: "add_todos_category",
    table: schema::TODOS_TABLE,
    column: "category",
    definition: "TEXT NOT NULL DEFAULT 'personal' CHECK(category IN ('personal', 'work', 'other'))",
    index: Some("CREATE INDEX IF NOT EXISTS idx_todos_category ON todos(category)"),
}];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("create base schema: {0}")]
    BaseSchema(#[source] rusqlite::Error),
    #[error("inspect columns of {table}: {source}")]
    Inspect {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("apply {name}: {source}")]
    Apply {
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Creates the base schema and applies every pending column step.
///
/// Returns the number of steps applied by this run.
pub fn run_migrations(conn: &mut Connection) -> Result<usize, MigrationError> {
    conn.execute_batch(schema::CREATE_TODOS_TABLE)
        .map_err(MigrationError::BaseSchema)?;

    let mut applied = 0;
    for migration in COLUMN_MIGRATIONS {
        if ensure_column(conn, migration)? {
            applied += 1;
        }
    }

    info!(applied, "database migration complete");
    Ok(applied)
}

/// Adds the column described by `migration` if the table lacks it.
///
/// Returns `true` when the column was added, `false` when it was already
/// present.
pub fn ensure_column(
    conn: &mut Connection,
    migration: &ColumnMigration,
) -> Result<bool, MigrationError> {
    let exists =
        column_exists(conn, migration.table, migration.column).map_err(|source| {
            MigrationError::Inspect {
                table: migration.table,
                source,
            }
        })?;

    if exists {
        debug!(
            migration = migration.name,
            column = migration.column,
            "column already present, skipping"
        );
        return Ok(false);
    }

    let apply = |conn: &mut Connection| -> rusqlite::Result<()> {
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            migration.table, migration.column, migration.definition
        ))?;
        if let Some(index) = migration.index {
            tx.execute_batch(index)?;
        }
        tx.commit()
    };

    apply(conn).map_err(|source| MigrationError::Apply {
        name: migration.name,
        source,
    })?;

    info!(
        migration = migration.name,
        table = migration.table,
        column = migration.column,
        "added column"
    );
    Ok(true)
}

/// Returns true if `table` currently has a column named `column`.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(schema::SELECT_TABLE_COLUMNS)?;
    let names = stmt.query_map([table], |row| row.get::<_, String>(0))?;

    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
