//! Typed field access with null handling and dirty tracking.
//!
//! Reads convert cells through [`FromValue`]; a null cell reads as the
//! type's zero value unless the caller asks for `Option<T>`. Writes coerce
//! to the column type, create missing columns when the table allows it, and
//! report whether the row was marked dirty.

use log::debug;
use rowlink_foundation::{Error, FromValue, Result, Value};

use crate::row::RowId;
use crate::schema::OptionalColumn;
use crate::table::Table;

impl Table {
    /// Reads the raw value of a field.
    ///
    /// # Errors
    ///
    /// Returns an error if the column or row does not exist.
    pub fn read_value(&self, id: RowId, field: &str) -> Result<Value> {
        let ordinal = self.ordinal(field)?;
        let row = self.row(id)?;
        Ok(self.cell(row, ordinal).clone())
    }

    /// Reads a typed field. A null cell yields `T::zero()`.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if the column does not exist, or a
    /// type mismatch error if the cell cannot be converted.
    pub fn read<T: FromValue>(&self, id: RowId, field: &str) -> Result<T> {
        let ordinal = self.ordinal(field)?;
        let row = self.row(id)?;
        T::from_cell(self.cell(row, ordinal))
    }

    /// Reads a typed field, preserving null as `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Table::read`].
    pub fn read_opt<T: FromValue>(&self, id: RowId, field: &str) -> Result<Option<T>> {
        self.read::<Option<T>>(id, field)
    }

    /// Reads an optional column, substituting its declared default when the
    /// table does not have the column.
    ///
    /// Only a missing column is tolerated; other failures propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the value (or default)
    /// cannot be converted.
    pub fn read_or_default<T: FromValue>(&self, id: RowId, column: &OptionalColumn) -> Result<T> {
        match self.read::<T>(id, &column.name) {
            Err(err) if err.is_column_not_found() => {
                self.row(id)?;
                debug!(
                    "event=optional_column_defaulted module=storage table={} column={}",
                    self.name(),
                    column.name
                );
                T::from_cell(&column.default)
            }
            other => other,
        }
    }

    /// Writes a field, returning whether the row was marked dirty.
    ///
    /// A missing column is created first when the table allows it. Writing
    /// the value a field already holds leaves the row untouched unless
    /// `force_dirty` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or is deleted, the column
    /// is missing and cannot be created, the value does not fit the column
    /// type, or null is written to a non-nullable column. The row is
    /// unchanged on error.
    pub fn write(
        &mut self,
        id: RowId,
        field: &str,
        value: impl Into<Value>,
        force_dirty: bool,
    ) -> Result<bool> {
        let value = value.into();
        // Validate the row before the schema is touched
        self.live_row_mut(id)?;

        let ordinal = self.ensure_column(field, value.value_type())?;
        let column = &self.schema().columns[ordinal];
        let value = column.ty.coerce(value)?;
        if value.is_null() && !column.nullable {
            return Err(Error::invalid_argument(format!(
                "column {} of table {} requires a value",
                column.name,
                self.name()
            )));
        }

        if self.is_key_column(ordinal) {
            let old = self.read_value(id, field)?;
            if old != value {
                self.reindex_key(id, &old, &value);
            }
        }

        self.set_cell(id, ordinal, value, force_dirty)
    }
}
