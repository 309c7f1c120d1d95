//! The in-memory relational store: a set of named tables.

use log::debug;
use rowlink_foundation::{Error, ErrorKind, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;
use crate::table::Table;

/// Named tables owned by one business entity.
///
/// Tables are kept in registration order. There are few tables per store,
/// so lookup by name is a linear scan.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowStore {
    tables: Vec<Table>,
}

impl RowStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    ///
    /// # Errors
    ///
    /// Returns an error if a table with the same name is already registered.
    pub fn add_table(&mut self, schema: TableSchema) -> Result<&mut Table> {
        if self.has_table(&schema.name) {
            return Err(Error::new(ErrorKind::DuplicateTable(schema.name.to_string())));
        }
        debug!(
            "event=table_added module=storage table={} columns={}",
            schema.name,
            schema.columns.len()
        );
        self.tables.push(Table::new(schema));
        let last = self.tables.len() - 1;
        Ok(&mut self.tables[last])
    }

    /// Builder-style variant of [`RowStore::add_table`].
    ///
    /// # Errors
    ///
    /// Returns an error if a table with the same name is already registered.
    pub fn with_table(mut self, schema: TableSchema) -> Result<Self> {
        self.add_table(schema)?;
        Ok(self)
    }

    /// Checks if a table exists.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name() == name)
    }

    /// Gets a table by name.
    ///
    /// # Errors
    ///
    /// Returns a table not found error if no table has this name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Gets a table by name for mutation.
    ///
    /// # Errors
    ///
    /// Returns a table not found error if no table has this name.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    /// Iterates tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables.iter()
    }

    /// Sets column auto-creation on every table.
    pub fn set_auto_create_columns(&mut self, enabled: bool) {
        for table in &mut self.tables {
            table.set_auto_create_columns(enabled);
        }
    }

    /// Returns true if any table has pending changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.tables.iter().any(Table::has_changes)
    }

    /// Commits pending changes in every table.
    pub fn accept_changes(&mut self) {
        for table in &mut self.tables {
            table.accept_changes();
        }
    }

    /// Discards pending changes in every table.
    pub fn reject_changes(&mut self) {
        for table in &mut self.tables {
            table.reject_changes();
        }
    }
}
