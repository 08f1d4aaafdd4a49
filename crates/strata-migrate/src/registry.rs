//! The migration unit contract and the ordered registry.

use strata_query::Statement;

use crate::MigrationError;

/// A named, one-time schema change.
///
/// Names are stable identities: once a unit has been applied and recorded,
/// its name must never be reused for a different change.
pub trait Migration {
    /// The unit's stable, unique name.
    fn name(&self) -> &str;

    /// Produces the unit's schema-definition statement, typically through
    /// [`strata_query::TableBuilder`].
    fn up(&self) -> Statement;
}

/// An ordered list of migration units, read-only after configuration.
///
/// Declaration order is application order.
#[derive(Default)]
pub struct MigrationRegistry {
    units: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a unit, rejecting a name that is already registered.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::DuplicateName` if a unit with the same name
    /// was registered earlier.
    pub fn register(&mut self, unit: Box<dyn Migration>) -> Result<(), MigrationError> {
        if self.units.iter().any(|existing| existing.name() == unit.name()) {
            return Err(MigrationError::DuplicateName(unit.name().to_string()));
        }
        self.units.push(unit);
        Ok(())
    }

    /// The registered units in declaration order.
    pub fn units(&self) -> &[Box<dyn Migration>] {
        &self.units
    }

    /// The number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
