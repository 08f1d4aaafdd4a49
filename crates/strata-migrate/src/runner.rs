//! The migration runner: bootstrap, pending-unit selection, atomic apply.

use rusqlite::{Connection, Row};
use strata_query::{Executor, QueryBuilder, QueryError, Record, Statement, TableBuilder};
use strata_types::Value;

use crate::registry::{Migration, MigrationRegistry};
use crate::MigrationError;

/// The append-only bookkeeping table recording applied migration names.
///
/// The runner owns this table's write path exclusively.
pub const TRACKING_TABLE: &str = "_strata_migrations";

/// One applied-migration row, read back through the ordinary record path.
struct AppliedMigration {
    name: String,
}

impl Record for AppliedMigration {
    const TABLE: &'static str = TRACKING_TABLE;
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
        })
    }
}

/// The built-in unit that creates the tracking table itself.
struct CreateMigrationsTable;

impl Migration for CreateMigrationsTable {
    fn name(&self) -> &str {
        "create_migrations_table"
    }

    fn up(&self) -> Statement {
        // IF NOT EXISTS keeps a concurrent bootstrap race harmless.
        TableBuilder::new(TRACKING_TABLE)
            .if_not_exists()
            .primary_key()
            .column("name TEXT NOT NULL UNIQUE")
            .column("applied_at TEXT NOT NULL DEFAULT (datetime('now'))")
            .render()
    }
}

/// Applies every registered unit that has not yet been applied, in
/// declaration order, returning the number applied.
///
/// On first run the tracking table is missing; it is created through the
/// ordinary builder + executor path before the applied set is re-read.
///
/// # Errors
///
/// Returns `MigrationError::ExecutionFailed` (naming the unit) if a schema
/// statement or its recording insert fails, or `MigrationError::StateQuery`
/// if the applied set cannot be read for any reason other than the missing
/// tracking table.
pub fn run_migrations(
    conn: &Connection,
    registry: &MigrationRegistry,
) -> Result<usize, MigrationError> {
    let applied = match read_applied(conn) {
        Ok(names) => names,
        Err(err) if is_missing_tracking_table(&err) => {
            bootstrap(conn)?;
            read_applied(conn).map_err(MigrationError::StateQuery)?
        }
        Err(err) => return Err(MigrationError::StateQuery(err)),
    };

    let mut count = 0;

    for unit in registry.units() {
        if applied.iter().any(|name| name == unit.name()) {
            tracing::debug!(migration = unit.name(), "migration already applied, skipping");
            continue;
        }

        tracing::info!(migration = unit.name(), "applying migration");
        apply_unit(conn, unit.as_ref())?;
        count += 1;
    }

    Ok(count)
}

fn read_applied(conn: &Connection) -> Result<Vec<String>, QueryError> {
    let query = QueryBuilder::new::<AppliedMigration>()
        .select("name")
        .order_by("id", strata_types::SortDirection::Asc);
    let rows = Executor::new(conn).get::<AppliedMigration>(&query)?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

fn is_missing_tracking_table(err: &QueryError) -> bool {
    matches!(
        err,
        QueryError::Database(rusqlite::Error::SqliteFailure(_, Some(message)))
            if message.contains("no such table")
    )
}

fn bootstrap(conn: &Connection) -> Result<(), MigrationError> {
    let unit = CreateMigrationsTable;
    tracing::info!(migration = unit.name(), "creating migration tracking table");

    Executor::new(conn)
        .execute(&unit.up())
        .map_err(|source| MigrationError::ExecutionFailed {
            name: unit.name().to_string(),
            source,
        })?;
    Ok(())
}

/// Executes the unit's schema statement and records its name, atomically.
fn apply_unit(conn: &Connection, unit: &dyn Migration) -> Result<(), MigrationError> {
    let wrap = |source: QueryError| MigrationError::ExecutionFailed {
        name: unit.name().to_string(),
        source,
    };

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| wrap(e.into()))?;

    let executor = Executor::new(&tx);
    executor.execute(&unit.up()).map_err(&wrap)?;
    executor
        .insert(TRACKING_TABLE, &[("name", Value::from(unit.name()))])
        .map_err(&wrap)?;

    tx.commit().map_err(|e| wrap(e.into()))?;
    Ok(())
}
