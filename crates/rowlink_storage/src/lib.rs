//! In-memory relational storage for rowlink.
//!
//! This crate provides:
//! - [`RowStore`] - Named tables owned by a business entity
//! - [`Table`] - Ordered rows with an additive schema and primary-key index
//! - [`Row`] - Cells with pending-change tracking
//! - Typed field access (`Table::read`, `Table::write`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod field;
pub mod row;
pub mod schema;
pub mod store;
pub mod table;

pub use row::{Row, RowId, RowState};
pub use schema::{ColumnSchema, OptionalColumn, TableSchema};
pub use store::RowStore;
pub use table::{RowView, Table};
