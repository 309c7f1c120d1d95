//! Typed extraction of cell values.
//!
//! [`FromValue`] is the read half of typed field access. A null cell is
//! never handed to [`FromValue::from_value`]; callers substitute
//! [`FromValue::zero`] instead, which for `Option<T>` is `None`. That makes
//! `Option<T>` the null-preserving way to read a field.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::types::Type;
use crate::value::Value;

/// A Rust type that can be read out of a cell.
pub trait FromValue: Sized {
    /// The column type this Rust type corresponds to.
    const TYPE: Type;

    /// The value substituted for a null cell.
    fn zero() -> Self;

    /// Converts a non-null cell value.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value cannot be converted.
    fn from_value(value: &Value) -> Result<Self>;

    /// Converts a cell value, substituting [`FromValue::zero`] for null.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value cannot be converted.
    fn from_cell(value: &Value) -> Result<Self> {
        if value.is_null() {
            Ok(Self::zero())
        } else {
            Self::from_value(value)
        }
    }
}

fn mismatch<T>(expected: Type, value: &Value) -> Result<T> {
    Err(Error::type_mismatch(expected, value.value_type()))
}

impl FromValue for Value {
    const TYPE: Type = Type::Any;

    fn zero() -> Self {
        Self::Null
    }

    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    const TYPE: Type = Type::Bool;

    fn zero() -> Self {
        false
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_bool()
            .map_or_else(|| mismatch(Self::TYPE, value), Ok)
    }
}

impl FromValue for i64 {
    const TYPE: Type = Type::Int;

    fn zero() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self> {
        value.as_int().map_or_else(|| mismatch(Self::TYPE, value), Ok)
    }
}

impl FromValue for i32 {
    const TYPE: Type = Type::Int;

    fn zero() -> Self {
        0
    }

    fn from_value(value: &Value) -> Result<Self> {
        let n = i64::from_value(value)?;
        Self::try_from(n).map_err(|_| {
            Error::invalid_argument(format!("integer {n} does not fit in 32 bits"))
        })
    }
}

impl FromValue for Decimal {
    const TYPE: Type = Type::Decimal;

    fn zero() -> Self {
        Self::ZERO
    }

    fn from_value(value: &Value) -> Result<Self> {
        let decimal = match value {
            Value::Float(n) => Self::from_f64(*n),
            other => other.as_decimal(),
        };
        decimal.map_or_else(|| mismatch(Self::TYPE, value), Ok)
    }
}

impl FromValue for f64 {
    const TYPE: Type = Type::Float;

    fn zero() -> Self {
        0.0
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_float()
            .map_or_else(|| mismatch(Self::TYPE, value), Ok)
    }
}

impl FromValue for String {
    const TYPE: Type = Type::String;

    fn zero() -> Self {
        Self::new()
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map_or_else(|| mismatch(Self::TYPE, value), |s| Ok(s.to_owned()))
    }
}

impl FromValue for Arc<str> {
    const TYPE: Type = Type::String;

    fn zero() -> Self {
        "".into()
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::clone(s)),
            other => mismatch(Self::TYPE, other),
        }
    }
}

impl FromValue for Uuid {
    const TYPE: Type = Type::Guid;

    fn zero() -> Self {
        Self::nil()
    }

    fn from_value(value: &Value) -> Result<Self> {
        match Self::TYPE.coerce(value.clone())? {
            Value::Guid(id) => Ok(id),
            other => mismatch(Self::TYPE, &other),
        }
    }
}

impl FromValue for Key {
    const TYPE: Type = Type::Any;

    fn zero() -> Self {
        Self::Int(0)
    }

    fn from_value(value: &Value) -> Result<Self> {
        Self::try_from(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE: Type = T::TYPE;

    fn zero() -> Self {
        None
    }

    fn from_value(value: &Value) -> Result<Self> {
        T::from_value(value).map(Some)
    }
}
