//! Statement building and query execution for the Strata data layer.
//!
//! Provides the parameterized SELECT builder, the CREATE TABLE builder used
//! by migrations, the [`Record`] mapping contract, and the [`Executor`] that
//! runs rendered statements against a borrowed SQLite connection.
//!
//! # Design decisions
//!
//! - **Bound parameters only**: filter values never appear in rendered SQL
//!   text. [`QueryBuilder::render`] produces a [`Statement`] carrying the
//!   text and an ordered binding list, and the executor binds at prepare
//!   time. Identifiers (tables, columns) are the caller's responsibility.
//! - **Validated mapping**: before mapping rows, the executor checks the
//!   result set's column names against the record's declared column set and
//!   fails with a [`MappingError`] naming the offending column, instead of
//!   assigning fields dynamically.
//! - **Explicit handle**: the executor borrows its `rusqlite::Connection`;
//!   there is no ambient or global connection lookup.

mod builder;
mod executor;
mod record;

pub use builder::{QueryBuilder, Statement, TableBuilder};
pub use executor::{Executor, QueryError};
pub use record::{check_columns, MappingError, Record};
