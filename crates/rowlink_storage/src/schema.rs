//! Schema definitions for tables and columns.
//!
//! Schemas define the structure and constraints of a table. They are
//! additive: columns can be added at runtime but never dropped.

use std::sync::Arc;

use rowlink_foundation::{Type, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Schema definition for a table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableSchema {
    /// Table name (e.g., `payment`, `card`).
    pub name: Arc<str>,
    /// Column definitions, in ordinal order.
    pub columns: Vec<ColumnSchema>,
    /// Name of the primary-key column, if the table has one.
    pub primary_key: Option<Arc<str>>,
    /// Whether writing an unknown column creates it.
    pub auto_create_columns: bool,
}

impl TableSchema {
    /// Creates a new table schema with no columns.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            auto_create_columns: true,
        }
    }

    /// Adds a column to the schema.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSchema) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a required column and designates it as the primary key.
    #[must_use]
    pub fn with_primary_key(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        let name = name.into();
        self.columns.push(ColumnSchema::required(Arc::clone(&name), ty));
        self.primary_key = Some(name);
        self
    }

    /// Sets whether unknown columns are created on first write.
    #[must_use]
    pub fn with_auto_create_columns(mut self, enabled: bool) -> Self {
        self.auto_create_columns = enabled;
        self
    }

    /// Returns the column schema by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| &*c.name == name)
    }
}

/// Schema definition for a column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnSchema {
    /// Column name.
    pub name: Arc<str>,
    /// Column type.
    pub ty: Type,
    /// Value used for new rows that do not provide one.
    pub default: Option<Value>,
    /// Whether the column may hold null.
    pub nullable: bool,
}

impl ColumnSchema {
    /// Creates a nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            nullable: true,
        }
    }

    /// Creates a non-nullable column with no default.
    #[must_use]
    pub fn required(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            nullable: false,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Returns the value a row holds for this column when it has none stored.
    #[must_use]
    pub fn initial_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

/// A column that may be missing from older schemas.
///
/// Reading an optional column that the table does not have yields the
/// declared default instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionalColumn {
    /// Column name.
    pub name: Arc<str>,
    /// Value substituted when the column is absent.
    pub default: Value,
}

impl OptionalColumn {
    /// Creates an optional column with its declared default.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }
}
