//! The record mapping contract.

use rusqlite::Row;
use thiserror::Error;

/// Errors raised when a result row does not match a record's declared
/// column set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// The row carries a column the record does not declare.
    #[error("row for '{record}' contains undeclared column '{column}'")]
    UnknownColumn {
        /// The record kind's table name.
        record: &'static str,
        /// The offending column.
        column: String,
    },

    /// A declared column is absent from the row.
    #[error("row for '{record}' is missing declared column '{column}'")]
    MissingColumn {
        /// The record kind's table name.
        record: &'static str,
        /// The missing column.
        column: &'static str,
    },
}

/// A named mapping between a table and an in-memory structured type.
///
/// Implementors declare their default table, the full column set a row is
/// expected to carry, and how to construct an instance from one row. Column
/// access in `from_row` should be by name; the executor has already verified
/// that the row's columns and `COLUMNS` correspond exactly.
pub trait Record: Sized {
    /// The default table this record reads from and writes to.
    const TABLE: &'static str;

    /// Every column a fully populated row carries, in declaration order.
    const COLUMNS: &'static [&'static str];

    /// Constructs an instance from one result row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Verifies that a result set's column names and `R::COLUMNS` correspond
/// exactly, in either direction.
///
/// # Errors
///
/// Returns `MappingError::UnknownColumn` for a row column the record does
/// not declare, or `MappingError::MissingColumn` for a declared column the
/// row does not carry.
pub fn check_columns<R: Record>(names: &[String]) -> Result<(), MappingError> {
    for name in names {
        if !R::COLUMNS.contains(&name.as_str()) {
            return Err(MappingError::UnknownColumn {
                record: R::TABLE,
                column: name.clone(),
            });
        }
    }

    for declared in R::COLUMNS {
        if !names.iter().any(|name| name == declared) {
            return Err(MappingError::MissingColumn {
                record: R::TABLE,
                column: declared,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    impl Record for User {
        const TABLE: &'static str = "users";
        const COLUMNS: &'static [&'static str] = &["id", "name"];

        fn from_row(_row: &Row<'_>) -> rusqlite::Result<Self> {
            Ok(User)
        }
    }

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_correspondence_passes() {
        check_columns::<User>(&names(&["id", "name"])).expect("matching columns should pass");
        // Order does not matter, only correspondence.
        check_columns::<User>(&names(&["name", "id"])).expect("reordered columns should pass");
    }

    #[test]
    fn undeclared_column_is_named_in_the_error() {
        let err = check_columns::<User>(&names(&["id", "name", "age"]))
            .expect_err("undeclared column should fail");
        assert_eq!(
            err,
            MappingError::UnknownColumn {
                record: "users",
                column: "age".to_string(),
            }
        );
    }

    #[test]
    fn missing_column_is_named_in_the_error() {
        let err = check_columns::<User>(&names(&["id"])).expect_err("missing column should fail");
        assert_eq!(
            err,
            MappingError::MissingColumn {
                record: "users",
                column: "name",
            }
        );
    }
}
