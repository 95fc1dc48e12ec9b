//! One configuration table per row type.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use watchtable_foundation::{Error, ErrorKind, Result};

use crate::table::{ConfigRow, ConfigTable};

/// Configuration tables looked up by row type.
#[derive(Default)]
pub struct ConfigRegistry {
    tables: HashMap<TypeId, Box<dyn Any>>,
    names: HashMap<TypeId, &'static str>,
}

impl fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names.values().collect();
        names.sort_unstable();
        f.debug_struct("ConfigRegistry")
            .field("tables", &names)
            .finish_non_exhaustive()
    }
}

impl ConfigRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registers the table for `R`.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateConfig` if `R` already has a table.
    pub fn register<R: ConfigRow>(&mut self, table: ConfigTable<R>) -> Result<()> {
        let id = TypeId::of::<R>();
        if self.tables.contains_key(&id) {
            return Err(Error::new(ErrorKind::DuplicateConfig(
                type_name::<R>().to_string(),
            )));
        }
        debug!(row = type_name::<R>(), rows = table.len(), "configuration registered");
        self.tables.insert(id, Box::new(table));
        self.names.insert(id, type_name::<R>());
        Ok(())
    }

    /// Registers or replaces the table for `R`, returning the old one.
    pub fn replace<R: ConfigRow>(&mut self, table: ConfigTable<R>) -> Option<ConfigTable<R>> {
        let id = TypeId::of::<R>();
        debug!(row = type_name::<R>(), rows = table.len(), "configuration replaced");
        self.names.insert(id, type_name::<R>());
        self.tables
            .insert(id, Box::new(table))
            .and_then(|old| old.downcast::<ConfigTable<R>>().ok())
            .map(|old| *old)
    }

    /// Returns true if `R` has a table.
    #[must_use]
    pub fn contains<R: ConfigRow>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<R>())
    }

    /// The table for `R`.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigNotRegistered` if `R` has no table.
    pub fn table<R: ConfigRow>(&self) -> Result<&ConfigTable<R>> {
        self.tables
            .get(&TypeId::of::<R>())
            .and_then(|table| table.downcast_ref::<ConfigTable<R>>())
            .ok_or_else(|| {
                Error::new(ErrorKind::ConfigNotRegistered(type_name::<R>().to_string()))
            })
    }

    /// Shorthand for `table::<R>()?.get(key)`.
    ///
    /// # Errors
    ///
    /// As [`ConfigRegistry::table`] and [`ConfigTable::get`].
    pub fn row<R: ConfigRow>(&self, key: &R::Key) -> Result<&R> {
        self.table::<R>()?.get(key)
    }
}
