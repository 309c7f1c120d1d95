//! Tables: ordered rows over an additive column schema.
//!
//! Each table keeps a primary-key index (key value -> live rows in insertion
//! order) so rows can be resolved by key in O(1) without building selection
//! expressions.

use std::collections::HashMap;
use std::sync::Arc;

use im::Vector;
use log::debug;
use rowlink_foundation::{Error, ErrorKind, Result, Type, Value};

use crate::row::{Row, RowId, RowState};
use crate::schema::{ColumnSchema, TableSchema};

static NULL: Value = Value::Null;

#[cfg(feature = "serde")]
mod serde_support {
    use super::Table;
    use crate::row::Row;
    use crate::schema::TableSchema;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct TableRef<'a> {
        schema: &'a TableSchema,
        rows: &'a [Row],
        next_id: u64,
    }

    #[derive(Deserialize)]
    struct TableData {
        schema: TableSchema,
        rows: Vec<Row>,
        next_id: u64,
    }

    impl Serialize for Table {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            // Indices are derived state and rebuilt on load
            TableRef {
                schema: &self.schema,
                rows: &self.rows,
                next_id: self.next_id,
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Table {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let data = TableData::deserialize(deserializer)?;
            let mut table = Table::new(data.schema);
            table.rows = data.rows;
            table.next_id = data.next_id;
            table.rebuild_indices();
            Ok(table)
        }
    }
}

/// A named table of rows.
#[derive(Clone, Debug)]
pub struct Table {
    schema: TableSchema,
    /// Column name -> ordinal.
    column_index: HashMap<Arc<str>, usize>,
    /// Rows in insertion order, including rows marked deleted.
    rows: Vec<Row>,
    /// Row id -> position in `rows`.
    positions: HashMap<RowId, usize>,
    /// Primary-key value -> live rows holding it, in insertion order.
    key_index: HashMap<Value, Vec<RowId>>,
    next_id: u64,
}

/// Borrowed view of one row, used by search predicates.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl<'a> RowView<'a> {
    /// Returns the row id.
    #[must_use]
    pub const fn id(&self) -> RowId {
        self.row.id()
    }

    /// Returns the value of a column, or `None` if the column does not exist.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let ordinal = *self.table.column_index.get(column)?;
        Some(self.table.cell(self.row, ordinal))
    }
}

impl Table {
    /// Creates an empty table from a schema.
    #[must_use]
    pub fn new(schema: TableSchema) -> Self {
        let column_index = schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (Arc::clone(&c.name), i))
            .collect();
        Self {
            schema,
            column_index,
            rows: Vec::new(),
            positions: HashMap::new(),
            key_index: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Returns the current schema.
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the primary-key column name.
    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.schema.primary_key.as_deref()
    }

    /// Returns the column schema by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.column_index
            .get(name)
            .map(|&ordinal| &self.schema.columns[ordinal])
    }

    /// Checks if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Returns the ordinal of a column.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if the column does not exist.
    pub fn ordinal(&self, name: &str) -> Result<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| Error::column_not_found(self.name(), name))
    }

    /// Sets whether writing an unknown column creates it.
    pub fn set_auto_create_columns(&mut self, enabled: bool) {
        self.schema.auto_create_columns = enabled;
    }

    /// Adds a column to the table.
    ///
    /// Returns `true` if the column was added, `false` if an identical
    /// column already existed. Existing rows read the column's default.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if a column with the same name but a
    /// different type exists.
    pub fn add_column(&mut self, column: ColumnSchema) -> Result<bool> {
        if let Some(existing) = self.column(&column.name) {
            if existing.ty != column.ty {
                return Err(Error::type_mismatch(existing.ty, column.ty));
            }
            return Ok(false);
        }

        debug!(
            "event=column_added module=storage table={} column={} type={}",
            self.schema.name, column.name, column.ty
        );
        let ordinal = self.schema.columns.len();
        self.column_index.insert(Arc::clone(&column.name), ordinal);
        self.schema.columns.push(column);
        Ok(true)
    }

    /// Returns the ordinal of a column, creating it if allowed.
    ///
    /// Created columns are nullable and take the type of the value that
    /// caused their creation.
    pub(crate) fn ensure_column(&mut self, name: &str, ty: Type) -> Result<usize> {
        if let Some(&ordinal) = self.column_index.get(name) {
            return Ok(ordinal);
        }
        if !self.schema.auto_create_columns {
            return Err(Error::column_not_found(self.name(), name));
        }
        let ty = if ty == Type::Null { Type::Any } else { ty };
        self.add_column(ColumnSchema::new(name, ty))?;
        self.ordinal(name)
    }

    /// Inserts a new row in the `Added` state.
    ///
    /// Columns not given take their default (or null).
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not fit its column, an unknown column
    /// cannot be created, or a non-nullable column would be null. The table
    /// rows are unchanged on error.
    pub fn insert<I, K, V>(&mut self, values: I) -> Result<RowId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut assigned = Vec::new();
        for (name, value) in values {
            let value = value.into();
            let ordinal = self.ensure_column(name.as_ref(), value.value_type())?;
            let value = self.schema.columns[ordinal].ty.coerce(value)?;
            assigned.push((ordinal, value));
        }

        let mut cells: Vector<Value> = self
            .schema
            .columns
            .iter()
            .map(ColumnSchema::initial_value)
            .collect();
        for (ordinal, value) in assigned {
            cells.set(ordinal, value);
        }

        for (column, cell) in self.schema.columns.iter().zip(cells.iter()) {
            if !column.nullable && cell.is_null() {
                return Err(Error::invalid_argument(format!(
                    "column {} of table {} requires a value",
                    column.name, self.schema.name
                )));
            }
        }

        let id = RowId::new(self.next_id);
        self.next_id += 1;
        let row = Row::new(id, cells);
        if let Some(key) = self.key_of(&row) {
            self.key_index.entry(key).or_default().push(id);
        }
        self.positions.insert(id, self.rows.len());
        self.rows.push(row);
        Ok(id)
    }

    /// Gets a row by id, including rows marked deleted.
    ///
    /// # Errors
    ///
    /// Returns a row not found error if no row has this id.
    pub fn row(&self, id: RowId) -> Result<&Row> {
        self.positions
            .get(&id)
            .map(|&pos| &self.rows[pos])
            .ok_or_else(|| Error::row_not_found(self.name(), id.index()))
    }

    pub(crate) fn live_row_mut(&mut self, id: RowId) -> Result<&mut Row> {
        let pos = *self
            .positions
            .get(&id)
            .ok_or_else(|| Error::row_not_found(&*self.schema.name, id.index()))?;
        let row = &mut self.rows[pos];
        if row.is_deleted() {
            return Err(Error::new(ErrorKind::RowDeleted {
                table: self.schema.name.to_string(),
                row: id.index(),
            }));
        }
        Ok(row)
    }

    /// Checks if a live (not deleted) row has this id.
    #[must_use]
    pub fn contains(&self, id: RowId) -> bool {
        self.row(id).is_ok_and(|row| !row.is_deleted())
    }

    /// Iterates live rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter().filter(|row| !row.is_deleted())
    }

    /// Iterates every row, including rows marked deleted.
    pub fn all_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    /// Returns the number of live rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().count()
    }

    /// Returns true if there are no live rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows().next().is_none()
    }

    /// Iterates the ids of live rows matching a predicate.
    pub fn find<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = RowId> + 'a
    where
        P: Fn(&RowView<'a>) -> bool + 'a,
    {
        self.rows()
            .map(move |row| RowView { table: self, row })
            .filter(move |view| predicate(view))
            .map(|view| view.id())
    }

    /// Returns the first live row matching a predicate.
    pub fn find_first<'a, P>(&'a self, predicate: P) -> Option<RowId>
    where
        P: Fn(&RowView<'a>) -> bool + 'a,
    {
        self.find(predicate).next()
    }

    /// Resolves a live row by primary-key value.
    ///
    /// Exact equality only. If several live rows share the key, the one
    /// inserted first wins.
    #[must_use]
    pub fn find_by_key(&self, key: &Value) -> Option<RowId> {
        self.key_index.get(key)?.first().copied()
    }

    /// Marks a row deleted.
    ///
    /// Rows added since the last accept are dropped immediately; other rows
    /// stay until [`Table::accept_changes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or is already deleted.
    pub fn delete(&mut self, id: RowId) -> Result<()> {
        let row = self.live_row_mut(id)?;
        let was_added = row.state() == RowState::Added;
        row.mark_deleted();

        let key = self.row(id).ok().and_then(|row| self.key_of(row));
        if let Some(key) = key {
            self.unindex_key(&key, id);
        }
        if was_added {
            self.rows.retain(|row| row.id() != id);
            self.rebuild_positions();
        }
        debug!(
            "event=row_deleted module=storage table={} row={}",
            self.schema.name,
            id.index()
        );
        Ok(())
    }

    /// Returns true if any row has pending changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(Row::is_dirty)
    }

    /// Commits pending changes: deleted rows are dropped, the rest become
    /// `Unchanged`.
    pub fn accept_changes(&mut self) {
        self.rows.retain(|row| !row.is_deleted());
        for row in &mut self.rows {
            row.accept();
        }
        self.rebuild_positions();
    }

    /// Discards pending changes: added rows are dropped, the rest revert to
    /// their last accepted values.
    pub fn reject_changes(&mut self) {
        self.rows.retain(|row| row.state() != RowState::Added);
        for row in &mut self.rows {
            row.reject();
        }
        self.rebuild_indices();
    }

    // --- Crate helpers ---

    /// Returns the effective value of a cell, falling back to the column's
    /// initial value for rows created before the column existed.
    pub(crate) fn cell<'a>(&'a self, row: &'a Row, ordinal: usize) -> &'a Value {
        row.cell(ordinal).unwrap_or_else(|| {
            self.schema.columns[ordinal]
                .default
                .as_ref()
                .unwrap_or(&NULL)
        })
    }

    pub(crate) fn set_cell(
        &mut self,
        id: RowId,
        ordinal: usize,
        value: Value,
        force: bool,
    ) -> Result<bool> {
        self.live_row_mut(id)?;
        let pos = self.positions[&id];
        Ok(self.rows[pos].set_cell(&self.schema.columns, ordinal, value, force))
    }

    pub(crate) fn is_key_column(&self, ordinal: usize) -> bool {
        self.schema
            .primary_key
            .as_ref()
            .is_some_and(|pk| &self.schema.columns[ordinal].name == pk)
    }

    pub(crate) fn reindex_key(&mut self, id: RowId, old: &Value, new: &Value) {
        if !old.is_null() {
            self.unindex_key(old, id);
        }
        if !new.is_null() {
            let ids = self.key_index.entry(new.clone()).or_default();
            ids.push(id);
            // Keep first-inserted-wins order
            let positions = &self.positions;
            ids.sort_by_key(|row| positions.get(row).copied().unwrap_or(usize::MAX));
        }
    }

    fn key_of(&self, row: &Row) -> Option<Value> {
        let pk = self.schema.primary_key.as_ref()?;
        let ordinal = *self.column_index.get(pk)?;
        let value = self.cell(row, ordinal);
        (!value.is_null()).then(|| value.clone())
    }

    fn unindex_key(&mut self, key: &Value, id: RowId) {
        if let Some(ids) = self.key_index.get_mut(key) {
            ids.retain(|row| *row != id);
            if ids.is_empty() {
                self.key_index.remove(key);
            }
        }
    }

    fn rebuild_positions(&mut self) {
        self.positions = self
            .rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.id(), pos))
            .collect();
    }

    fn rebuild_indices(&mut self) {
        self.rebuild_positions();
        self.column_index = self
            .schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (Arc::clone(&c.name), i))
            .collect();

        let mut key_index: HashMap<Value, Vec<RowId>> = HashMap::new();
        for row in self.rows.iter().filter(|row| !row.is_deleted()) {
            if let Some(key) = self.key_of(row) {
                key_index.entry(key).or_default().push(row.id());
            }
        }
        self.key_index = key_index;
    }
}
