//! Sub-item collections: child rows that reference a parent by key.

use std::sync::Arc;

use rowlink_foundation::{Error, FromValue, Result, Value};
use rowlink_storage::{RowId, Table};

use crate::entity::BusinessEntity;
use crate::notify::{ChangeEvent, ChangeObserver, Observers};

/// Where a collection's rows live and how they point at their parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubItemSpec {
    /// The child table.
    pub table: Arc<str>,
    /// The child column holding the parent key.
    pub parent_column: Arc<str>,
}

impl SubItemSpec {
    /// Creates a spec for a child table.
    #[must_use]
    pub fn new(table: impl Into<Arc<str>>, parent_column: impl Into<Arc<str>>) -> Self {
        Self {
            table: table.into(),
            parent_column: parent_column.into(),
        }
    }
}

/// An ordered view of the child rows belonging to an entity's master row.
#[derive(Debug)]
pub struct SubItemCollection {
    spec: SubItemSpec,
    rows: Vec<RowId>,
    observers: Observers,
}

impl SubItemCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(spec: SubItemSpec) -> Self {
        Self {
            spec,
            rows: Vec::new(),
            observers: Observers::default(),
        }
    }

    /// Collects the live child rows whose parent column equals the entity
    /// key, in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no key or the child table is
    /// missing.
    pub fn load(spec: SubItemSpec, entity: &BusinessEntity) -> Result<Self> {
        let key = entity.key()?;
        let table = entity.store().table(&spec.table)?;
        let rows = match stored_form(table, &spec.parent_column, key) {
            Some(key) => table
                .find(|row| row.get(&spec.parent_column) == Some(&key))
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            spec,
            rows,
            observers: Observers::default(),
        })
    }

    /// Returns the collection spec.
    #[must_use]
    pub const fn spec(&self) -> &SubItemSpec {
        &self.spec
    }

    /// Inserts a child row pointing at the entity and adds it as an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no key or the values do not fit
    /// the child table. Nothing changes on error.
    pub fn add_new<I, K, V>(&mut self, entity: &mut BusinessEntity, values: I) -> Result<RowId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let key = entity.key()?;
        let mut cells: Vec<(Arc<str>, Value)> = values
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into()))
            .collect();
        cells.push((Arc::clone(&self.spec.parent_column), key));

        let row = entity.insert_row(&self.spec.table, cells)?;
        self.attach(row);
        Ok(row)
    }

    /// Deletes an item row.
    ///
    /// Returns `false` if the row is not an item of this collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the row could not be deleted.
    pub fn remove(&mut self, entity: &mut BusinessEntity, row: RowId) -> Result<bool> {
        if !self.contains(row) {
            return Ok(false);
        }
        entity.delete_row(&self.spec.table, row)?;
        self.detach(row);
        Ok(true)
    }

    /// Reads a field of an item row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is not an item, or the read fails.
    pub fn get<T: FromValue>(&self, entity: &BusinessEntity, row: RowId, field: &str) -> Result<T> {
        self.check_item(row)?;
        entity.store().table(&self.spec.table)?.read(row, field)
    }

    /// Writes a field of an item row, returning whether the row became
    /// dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is not an item, or the write fails.
    pub fn set(
        &self,
        entity: &mut BusinessEntity,
        row: RowId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<bool> {
        self.check_item(row)?;
        entity.write_field(&self.spec.table, row, field, value.into(), false)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates item rows in order.
    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().copied()
    }

    /// Returns the item row at a position.
    #[must_use]
    pub fn row_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).copied()
    }

    /// Checks if a row is an item.
    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        self.rows.contains(&row)
    }

    /// Registers an observer for membership events.
    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.subscribe(observer);
    }

    pub(crate) fn attach(&mut self, row: RowId) {
        self.rows.push(row);
        self.observers.emit(&ChangeEvent::ItemAdded {
            table: Arc::clone(&self.spec.table),
            row,
        });
    }

    pub(crate) fn detach(&mut self, row: RowId) {
        self.rows.retain(|r| *r != row);
        self.observers.emit(&ChangeEvent::ItemRemoved {
            table: Arc::clone(&self.spec.table),
            row,
        });
    }

    fn check_item(&self, row: RowId) -> Result<()> {
        if self.contains(row) {
            Ok(())
        } else {
            Err(Error::row_not_found(&*self.spec.table, row.index()))
        }
    }
}

/// Converts a value to the form `column` stores it in, or `None` if the
/// column cannot hold it. Values for undeclared columns are kept as given.
pub(crate) fn stored_form(table: &Table, column: &str, value: Value) -> Option<Value> {
    match table.column(column) {
        Some(schema) => schema.ty.coerce(value).ok(),
        None => Some(value),
    }
}
