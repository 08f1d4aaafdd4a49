//! Statement execution against a borrowed connection.

use rusqlite::{params_from_iter, Connection};
use strata_types::Value;
use thiserror::Error;

use crate::builder::{QueryBuilder, Statement};
use crate::record::{check_columns, MappingError, Record};

/// Errors that can occur while executing a statement.
///
/// Database errors propagate untranslated; this layer does not retry.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Executes rendered statements against a borrowed SQLite connection.
///
/// The connection is supplied explicitly at construction; the executor never
/// opens, closes, or pools connections itself.
pub struct Executor<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Executor<'conn> {
    /// Creates an executor over the given connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Renders the query, executes it, and maps every result row to `R`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Mapping` when the result set's columns do not
    /// correspond to `R::COLUMNS`, or `QueryError::Database` for any
    /// underlying SQLite failure.
    pub fn get<R: Record>(&self, query: &QueryBuilder) -> Result<Vec<R>, QueryError> {
        let statement = query.render();
        tracing::debug!(sql = %statement.sql, "executing select");

        let mut prepared = self.conn.prepare(&statement.sql)?;
        let names: Vec<String> = prepared
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        check_columns::<R>(&names)?;

        let rows = prepared.query_map(params_from_iter(statement.bindings.iter()), |row| {
            R::from_row(row)
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Returns the first matching record, or `None` on an empty result set.
    ///
    /// Equivalent to `limit(1)` followed by [`get`](Self::get).
    pub fn first<R: Record>(&self, query: QueryBuilder) -> Result<Option<R>, QueryError> {
        Ok(self.get(&query.limit(1))?.into_iter().next())
    }

    /// Inserts one row with exactly the supplied columns, returning the
    /// generated rowid.
    ///
    /// Values are bound, never interpolated into the statement text.
    pub fn insert(&self, table: &str, fields: &[(&str, Value)]) -> Result<i64, QueryError> {
        let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|n| format!("?{n}")).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        tracing::debug!(sql = %sql, "executing insert");

        self.conn.execute(
            &sql,
            params_from_iter(fields.iter().map(|(_, value)| value)),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Executes a rendered statement, returning the affected-row count.
    ///
    /// Used for schema statements and other writes that map no records.
    pub fn execute(&self, statement: &Statement) -> Result<usize, QueryError> {
        tracing::debug!(sql = %statement.sql, "executing statement");
        let count = self
            .conn
            .execute(&statement.sql, params_from_iter(statement.bindings.iter()))?;
        Ok(count)
    }
}
