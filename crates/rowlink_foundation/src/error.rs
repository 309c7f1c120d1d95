//! Error types for the rowlink system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// Result alias used throughout rowlink.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for rowlink operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the operation that failed, keeping any existing frames.
    #[must_use]
    pub fn in_operation(self, operation: &str) -> Self {
        let context = match self.context {
            Some(ctx) => ctx.with_frame(operation),
            None => ErrorContext::new().with_operation(operation),
        };
        Self {
            kind: self.kind,
            context: Some(context),
        }
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a column not found error.
    #[must_use]
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(ErrorKind::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        })
    }

    /// Creates a table not found error.
    #[must_use]
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::new(ErrorKind::TableNotFound(table.into()))
    }

    /// Creates a row not found error.
    #[must_use]
    pub fn row_not_found(table: impl Into<String>, row: u64) -> Self {
        Self::new(ErrorKind::RowNotFound {
            table: table.into(),
            row,
        })
    }

    /// Creates a target not found error.
    #[must_use]
    pub fn target_not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(ErrorKind::TargetNotFound {
            table: table.into(),
            key: key.into(),
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Returns true if this is a column not found error.
    #[must_use]
    pub const fn is_column_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::ColumnNotFound { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Type mismatch while reading or writing a cell.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// Column does not exist and could not be created.
    #[error("column not found: {column} on table {table}")]
    ColumnNotFound {
        /// The table that was queried.
        table: String,
        /// The column name that was not found.
        column: String,
    },

    /// Table does not exist in the store.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A table with the same name is already registered.
    #[error("table already exists: {0}")]
    DuplicateTable(String),

    /// Row id does not exist in the table.
    #[error("row not found: {row} in table {table}")]
    RowNotFound {
        /// The table that was queried.
        table: String,
        /// The raw row id.
        row: u64,
    },

    /// Row is marked deleted and cannot be mutated.
    #[error("row {row} in table {table} is deleted")]
    RowDeleted {
        /// The table owning the row.
        table: String,
        /// The raw row id.
        row: u64,
    },

    /// Foreign key does not resolve to a row of the target table.
    #[error("no row in {table} has key {key}")]
    TargetNotFound {
        /// The target table searched.
        table: String,
        /// The key that failed to resolve.
        key: String,
    },

    /// A null or empty identifier was passed where a concrete value is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The persistence collaborator reported a failure.
    #[error("persist failed: {0}")]
    PersistFailed(String),

    /// Store snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed.
    pub operation: Option<String>,
    /// Stack of enclosing operations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds an enclosing frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        for frame in &self.stack {
            write!(f, "\n  in {frame}")?;
        }
        Ok(())
    }
}
