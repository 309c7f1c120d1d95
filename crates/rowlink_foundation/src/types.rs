//! Column type descriptors and value coercion.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// Type descriptor for a table column.
///
/// Used to declare column types and to coerce written values so that a
/// column only ever holds values of its declared type (or null).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The null type (only value: null).
    Null,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// Exact decimal (money, quantities).
    Decimal,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Opaque 128-bit identifier.
    Guid,
    /// Any type (accepts any value, no coercion).
    Any,
}

impl Type {
    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true if values of this type are numeric.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Decimal | Self::Float)
    }

    /// Returns the zero value of this type.
    ///
    /// This is what a typed read yields for a null cell. `Any` and `Null`
    /// have no zero value other than null itself.
    #[must_use]
    pub fn zero_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Decimal => Value::Decimal(Decimal::ZERO),
            Self::Float => Value::Float(0.0),
            Self::String => Value::String("".into()),
            Self::Guid => Value::Guid(Uuid::nil()),
            Self::Null | Self::Any => Value::Null,
        }
    }

    /// Checks if a value type is accepted by this type without conversion.
    ///
    /// - `Any` accepts all types
    /// - Every type accepts `Null`
    /// - Otherwise the types must match exactly
    #[must_use]
    pub fn accepts(self, value_type: Type) -> bool {
        self.is_any() || value_type == Self::Null || self == value_type
    }

    /// Converts a value so it can be stored in a column of this type.
    ///
    /// Supported widenings:
    /// - `Int` into `Decimal` or `Float`
    /// - `Decimal` into `Float`
    /// - `Float` into `Decimal` (finite values only)
    /// - `String` into `Guid` when the string parses as a UUID
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value cannot be represented in
    /// this type.
    pub fn coerce(self, value: Value) -> Result<Value> {
        let actual = value.value_type();
        if self.accepts(actual) {
            return Ok(value);
        }

        let coerced = match (self, &value) {
            (Self::Decimal, Value::Int(n)) => Some(Value::Decimal(Decimal::from(*n))),
            (Self::Decimal, Value::Float(n)) => Decimal::from_f64(*n).map(Value::Decimal),
            (Self::Float, Value::Decimal(d)) => d.to_f64().map(Value::Float),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float, Value::Int(n)) => Some(Value::Float(*n as f64)),
            (Self::Guid, Value::String(s)) => Uuid::from_str(s).ok().map(Value::Guid),
            _ => None,
        };

        coerced.ok_or_else(|| Error::type_mismatch(self, actual))
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Decimal => write!(f, "decimal"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Guid => write!(f, "guid"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
