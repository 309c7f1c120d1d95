//! Business entities: a row store with a designated master row.
//!
//! A concrete entity wraps a [`BusinessEntity`] alongside its collections.
//! Every mutation made through the entity (directly, or by a collection or
//! link item given `&mut BusinessEntity`) is routed through here so change
//! events are emitted in one place.

use std::sync::Arc;

use log::{debug, info};
use rowlink_foundation::{Error, FromValue, Result, Value};
use rowlink_storage::{OptionalColumn, RowId, RowState, RowStore};

use crate::config::EntityConfig;
use crate::diagnostics;
use crate::notify::{ChangeEvent, ChangeObserver, Observers};
use crate::persist::Persist;

/// A row store together with the master row it describes.
#[derive(Debug)]
pub struct BusinessEntity {
    store: RowStore,
    master_table: Arc<str>,
    master_row: RowId,
    config: EntityConfig,
    observers: Observers,
}

impl BusinessEntity {
    /// Wraps a store whose master row already exists.
    ///
    /// The configuration's column auto-creation is applied to every table.
    ///
    /// # Errors
    ///
    /// Returns an error if the master table or a live master row is missing.
    pub fn new(
        mut store: RowStore,
        master_table: impl Into<Arc<str>>,
        master_row: RowId,
        config: EntityConfig,
    ) -> Result<Self> {
        let master_table = master_table.into();
        store.set_auto_create_columns(config.auto_create_columns);

        let table = store.table(&master_table)?;
        if !table.contains(master_row) {
            return Err(Error::row_not_found(&*master_table, master_row.index()));
        }

        Ok(Self {
            store,
            master_table,
            master_row,
            config,
            observers: Observers::default(),
        })
    }

    /// Inserts a new master row and wraps the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the master table is missing or the values do not
    /// fit its schema.
    pub fn create<I, K, V>(
        mut store: RowStore,
        master_table: impl Into<Arc<str>>,
        values: I,
        config: EntityConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let master_table = master_table.into();
        store.set_auto_create_columns(config.auto_create_columns);
        let master_row = store
            .table_mut(&master_table)?
            .insert(values)
            .map_err(|e| e.in_operation("create"))?;
        debug!(
            "event=entity_created module=entity table={master_table} row={}",
            master_row.index()
        );
        Self::new(store, master_table, master_row, config)
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &RowStore {
        &self.store
    }

    /// Returns the master table name.
    #[must_use]
    pub fn master_table(&self) -> &str {
        &self.master_table
    }

    /// Returns the master row id.
    #[must_use]
    pub const fn master_row(&self) -> RowId {
        self.master_row
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EntityConfig {
        &self.config
    }

    // --- Master row fields ---

    /// Reads a master-row field. A null cell yields the type's zero value.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or the value does not
    /// convert.
    pub fn get<T: FromValue>(&self, field: &str) -> Result<T> {
        self.store
            .table(&self.master_table)?
            .read(self.master_row, field)
    }

    /// Reads a master-row field, preserving null as `None`.
    ///
    /// # Errors
    ///
    /// Same as [`BusinessEntity::get`].
    pub fn get_opt<T: FromValue>(&self, field: &str) -> Result<Option<T>> {
        self.get::<Option<T>>(field)
    }

    /// Reads a master-row field that older schemas may lack.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the column being absent.
    pub fn get_or_default<T: FromValue>(&self, column: &OptionalColumn) -> Result<T> {
        self.store
            .table(&self.master_table)?
            .read_or_default(self.master_row, column)
    }

    /// Reads the raw value of a master-row field.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing.
    pub fn get_value(&self, field: &str) -> Result<Value> {
        self.store
            .table(&self.master_table)?
            .read_value(self.master_row, field)
    }

    /// Writes a master-row field, returning whether the entity became dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be created or the value does
    /// not fit it. Nothing changes on error.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<bool> {
        let (table, row) = (Arc::clone(&self.master_table), self.master_row);
        self.write_field(&table, row, field, value.into(), false)
    }

    /// Writes a master-row field and marks the row dirty even if the value
    /// is unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`BusinessEntity::set`].
    pub fn set_forced(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let (table, row) = (Arc::clone(&self.master_table), self.master_row);
        self.write_field(&table, row, field, value.into(), true)
            .map(|_| ())
    }

    /// Returns the master row's primary-key value.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if the master table has no primary
    /// key or the key is null.
    pub fn key(&self) -> Result<Value> {
        let table = self.store.table(&self.master_table)?;
        let column = table.primary_key().ok_or_else(|| {
            Error::invalid_argument(format!(
                "table {} has no primary key",
                self.master_table
            ))
        })?;
        let key = table.read_value(self.master_row, column)?;
        if key.is_null() {
            return Err(Error::invalid_argument(format!(
                "master row of {} has a null key",
                self.master_table
            )));
        }
        Ok(key)
    }

    // --- Change tracking ---

    /// Returns true if any row in the store has pending changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.store.has_changes()
    }

    /// Commits all pending changes.
    pub fn accept_changes(&mut self) {
        self.store.accept_changes();
    }

    /// Discards all pending changes.
    pub fn reject_changes(&mut self) {
        self.store.reject_changes();
        let table = Arc::clone(&self.master_table);
        self.notify_data_changed(&table);
    }

    /// Registers an observer for entity-level events.
    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.subscribe(observer);
    }

    /// Emits a data-changed event for a table.
    pub fn notify_data_changed(&mut self, table: &str) {
        self.observers.emit(&ChangeEvent::DataChanged {
            table: table.into(),
        });
    }

    // --- Persistence ---

    /// Saves through a persister and accepts changes on success.
    ///
    /// # Errors
    ///
    /// Returns the persister's error; pending changes are kept.
    pub fn save(&mut self, persist: &mut dyn Persist) -> Result<()> {
        match persist.save(self) {
            Ok(()) => {
                self.accept_changes();
                info!(
                    "event=entity_saved module=entity table={} status=ok",
                    self.master_table
                );
                Ok(())
            }
            Err(e) => {
                info!(
                    "event=entity_saved module=entity table={} status=error error={e}",
                    self.master_table
                );
                Err(e.in_operation("save"))
            }
        }
    }

    /// Marks the master row deleted, removes through a persister, and
    /// accepts changes on success.
    ///
    /// A master row added since the last accept was never persisted: it is
    /// dropped at once and the persister is not called.
    ///
    /// # Errors
    ///
    /// Returns an error if the master row is already deleted or the
    /// persister fails; on persister failure the deletion stays pending.
    pub fn remove(&mut self, persist: &mut dyn Persist) -> Result<()> {
        let (table, row) = (Arc::clone(&self.master_table), self.master_row);
        let unsaved = self.store.table(&table)?.row(row)?.state() == RowState::Added;
        self.delete_row(&table, row)
            .map_err(|e| e.in_operation("remove"))?;
        if unsaved {
            info!("event=entity_removed module=entity table={table} status=skipped reason=unsaved");
            return Ok(());
        }

        match persist.remove(self) {
            Ok(()) => {
                self.accept_changes();
                info!("event=entity_removed module=entity table={table} status=ok");
                Ok(())
            }
            Err(e) => {
                info!("event=entity_removed module=entity table={table} status=error error={e}");
                Err(e.in_operation("remove"))
            }
        }
    }

    /// Renders the store as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the store cannot be encoded.
    pub fn dump(&self) -> Result<String> {
        diagnostics::dump_json(&self.store, self.config.pretty_dump)
    }

    // --- Crate mutation paths ---

    /// Writes a field of any row, emitting `DataChanged` when the row was
    /// marked dirty.
    pub(crate) fn write_field(
        &mut self,
        table: &str,
        row: RowId,
        field: &str,
        value: Value,
        force_dirty: bool,
    ) -> Result<bool> {
        let dirty = self
            .store
            .table_mut(table)?
            .write(row, field, value, force_dirty)
            .map_err(|e| e.in_operation("write"))?;
        if self.config.log_field_writes {
            debug!(
                "event=field_written module=entity table={table} row={} field={field} dirty={dirty}",
                row.index()
            );
        }
        if dirty {
            self.notify_data_changed(table);
        }
        Ok(dirty)
    }

    /// Inserts a row into any table and emits `DataChanged`.
    pub(crate) fn insert_row(&mut self, table: &str, values: Vec<(Arc<str>, Value)>) -> Result<RowId> {
        let row = self
            .store
            .table_mut(table)?
            .insert(values)
            .map_err(|e| e.in_operation("insert"))?;
        self.notify_data_changed(table);
        Ok(row)
    }

    /// Deletes a row of any table and emits `DataChanged`.
    pub(crate) fn delete_row(&mut self, table: &str, row: RowId) -> Result<()> {
        self.store
            .table_mut(table)?
            .delete(row)
            .map_err(|e| e.in_operation("delete"))?;
        self.notify_data_changed(table);
        Ok(())
    }
}
