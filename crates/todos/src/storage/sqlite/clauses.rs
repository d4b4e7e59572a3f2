//! Builders for statements whose clauses depend on which fields are present.
//!
//! Pure functions: every value is bound positionally and never formatted into
//! the statement text. The builders can be tested without a database.

use rusqlite::types::Value;

use todos_core::storage::TodoFilter;
use todos_core::todo::UpdateTodoRequest;

use super::schema;

/// An ordered list of `column = ?n` clauses and their bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    items: Vec<(&'static str, Value)>,
}

impl Clauses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clause for `column` bound to `value`.
    pub fn push(&mut self, column: &'static str, value: impl Into<Value>) {
        self.items.push((column, value.into()));
    }

    /// Appends a clause only when the value is present.
    pub fn push_if_present<T: Into<Value>>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.push(column, value);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Renders the clauses joined by `separator`, numbering placeholders from
    /// `first`.
    pub fn render(&self, separator: &str, first: usize) -> String {
        self.items
            .iter()
            .enumerate()
            .map(|(offset, (column, _))| format!("{column} = ?{}", first + offset))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Consumes the builder, returning the values in placeholder order.
    pub fn into_params(self) -> Vec<Value> {
        self.items.into_iter().map(|(_, value)| value).collect()
    }
}

/// Statement text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Builds the list query: present predicates joined by `AND`, ordered by id.
pub fn list_statement(filter: &TodoFilter) -> Statement {
    if filter.is_empty() {
        return Statement {
            sql: format!("{} {}", schema::SELECT_TODOS, schema::ORDER_BY_ID),
            params: Vec::new(),
        };
    }

    let mut predicates = Clauses::new();
    predicates.push_if_present("status", filter.status.map(|s| s.as_str().to_owned()));
    predicates.push_if_present(
        "category",
        filter.category.map(|c| c.as_str().to_owned()),
    );

    let sql = format!(
        "{} WHERE {} {}",
        schema::SELECT_TODOS,
        predicates.render(" AND ", 1),
        schema::ORDER_BY_ID,
    );

    Statement {
        sql,
        params: predicates.into_params(),
    }
}

/// Builds the partial update for `id`.
///
/// Returns `None` when the request supplies no field, in which case nothing
/// should be written and `updated_at` must stay untouched.
pub fn update_statement(id: i64, request: &UpdateTodoRequest) -> Option<Statement> {
    if request.is_empty() {
        return None;
    }

    let mut assignments = Clauses::new();
    assignments.push_if_present("title", request.title.clone());
    assignments.push_if_present("description", request.description.clone());
    assignments.push_if_present("status", request.status.map(|s| s.as_str().to_owned()));
    assignments.push_if_present(
        "category",
        request.category.map(|c| c.as_str().to_owned()),
    );
    assignments.push_if_present("progress_percent", request.progress_percent);

    let id_placeholder = assignments.len() + 1;
    let sql = format!(
        "UPDATE {} SET {}, {} WHERE id = ?{id_placeholder}",
        schema::TODOS_TABLE,
        assignments.render(", ", 1),
        schema::TOUCH_UPDATED_AT,
    );

    let mut params = assignments.into_params();
    params.push(Value::Integer(id));

    Some(Statement { sql, params })
}
