//! Named, one-time schema migrations for the Strata data layer.
//!
//! A migration is a named unit producing exactly one schema-definition
//! statement. Units are registered in order, applied in that order, and
//! tracked by name in the `_strata_migrations` table so each runs exactly
//! once. The tracking table itself is created on first run through the
//! ordinary statement-builder and executor path.
//!
//! Applying a unit executes its statement and records its name inside one
//! transaction, so a failure in either step leaves neither behind. The
//! UNIQUE constraint on the recorded name doubles as a guard against two
//! concurrent runners applying the same unit: the loser's recording insert
//! fails and its schema change rolls back with it.

mod registry;
mod runner;

use strata_query::QueryError;
use thiserror::Error;

pub use registry::{Migration, MigrationRegistry};
pub use runner::{run_migrations, TRACKING_TABLE};

/// Errors that can occur during migration registration or execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A unit's schema statement or its recording insert failed.
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the migration that failed.
        name: String,
        /// The underlying execution error.
        source: QueryError,
    },

    /// Failed to read the set of applied migration names.
    #[error("failed to read applied migrations: {0}")]
    StateQuery(QueryError),

    /// Two units with the same name were registered.
    #[error("duplicate migration name: '{0}'")]
    DuplicateName(String),
}
