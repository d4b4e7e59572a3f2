//! SQLite row conversion functions.
//!
//! Pure functions for converting SQLite rows into domain types. These are
//! testable in isolation with an in-memory connection.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use todos_core::todo::{Category, Status, Todo};

/// Convert a SQLite row to a Todo.
///
/// Expected columns: id, title, description, status, category,
/// progress_percent, created_at, updated_at
pub fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let description: String = row.get(2)?;
    let status: String = row.get(3)?;
    let category: String = row.get(4)?;
    let progress_percent: u8 = row.get(5)?;
    let created_at: Option<String> = row.get(6)?;
    let updated_at: Option<String> = row.get(7)?;

    Ok(Todo {
        id,
        title,
        description,
        status: parse_status(3, &status)?,
        category: parse_category(4, &category)?,
        progress_percent,
        created_at: parse_timestamp(created_at.as_deref()),
        updated_at: parse_timestamp(updated_at.as_deref()),
    })
}

fn parse_status(column: usize, s: &str) -> rusqlite::Result<Status> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_category(column: usize, s: &str) -> rusqlite::Result<Category> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse a store-formatted RFC 3339 timestamp.
///
/// Missing or malformed values never fail the read: they become the zero
/// timestamp (the Unix epoch) and a warning is logged.
pub fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = value else {
        tracing::warn!("Missing timestamp in todos row, using zero value");
        return DateTime::<Utc>::default();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Unparsable timestamp, using zero value");
            DateTime::<Utc>::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rusqlite::Connection;

    fn query_todo(select: &str) -> rusqlite::Result<Todo> {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(select, [], row_to_todo)
    }

    #[test]
    fn test_row_to_todo() {
        let todo = query_todo(
            "SELECT 1, 'Buy milk', 'Semi-skimmed', 'in_progress', 'work', 25, \
             '2024-06-15T10:30:00.250Z', '2024-06-15T11:00:00.000Z'",
        )
        .unwrap();

        assert_eq!(todo.id, 1);
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, "Semi-skimmed");
        assert_eq!(todo.status, Status::InProgress);
        assert_eq!(todo.category, Category::Work);
        assert_eq!(todo.progress_percent, 25);
        assert_eq!(
            todo.created_at,
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
        assert_eq!(
            todo.updated_at,
            Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_row_to_todo_rejects_unknown_status() {
        let result = query_todo(
            "SELECT 1, 't', '', 'archived', 'work', 0, \
             '2024-06-15T10:30:00.000Z', '2024-06-15T10:30:00.000Z'",
        );

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _))
        ));
    }

    #[test]
    fn test_row_to_todo_rejects_unknown_category() {
        let result = query_todo(
            "SELECT 1, 't', '', 'done', 'hobby', 0, \
             '2024-06-15T10:30:00.000Z', '2024-06-15T10:30:00.000Z'",
        );

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(4, Type::Text, _))
        ));
    }

    #[test]
    fn test_row_to_todo_tolerates_bad_timestamps() {
        let todo = query_todo("SELECT 1, 't', '', 'done', 'other', 100, 'yesterday', NULL").unwrap();

        assert_eq!(todo.created_at, DateTime::<Utc>::default());
        assert_eq!(todo.updated_at, DateTime::<Utc>::default());
        assert_eq!(todo.progress_percent, 100);
    }

    #[test]
    fn test_parse_timestamp_valid() {
        let parsed = parse_timestamp(Some("2026-02-12T15:04:05Z"));
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 12, 15, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_timestamp_invalid_is_zero() {
        assert_eq!(parse_timestamp(Some("not-a-date")), DateTime::<Utc>::default());
        assert_eq!(parse_timestamp(Some("")), DateTime::<Utc>::default());
        assert_eq!(parse_timestamp(None), DateTime::<Utc>::default());
    }

    #[test]
    fn test_store_format_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        let formatted: String = conn
            .query_row(
                "SELECT strftime('%Y-%m-%dT%H:%M:%fZ', '2024-01-02 03:04:05')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(formatted, "2024-01-02T03:04:05.000Z");
        assert_eq!(
            parse_timestamp(Some(&formatted)),
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        );
    }
}
