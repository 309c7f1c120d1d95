//! Core values, keys, types, and errors for rowlink.
//!
//! This crate provides:
//! - [`Value`] - The cell value type for all stored data
//! - [`Key`] - Numeric, identifier, and string row keys
//! - [`Type`] - Column type descriptors with coercion rules
//! - [`FromValue`] - Typed extraction of cell values
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod error;
pub mod key;
pub mod types;
pub mod value;

pub use convert::FromValue;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use key::Key;
pub use types::Type;
pub use value::Value;

pub use rust_decimal::Decimal;
pub use uuid::Uuid;
