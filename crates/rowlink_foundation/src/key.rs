//! Primary and foreign key identifiers.
//!
//! Keys come in three kinds: numeric, opaque 128-bit identifiers, and
//! strings. Lookup by key is identical for every kind; only the wrapped
//! value differs.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// A concrete key value used to address a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Key {
    /// Numeric key.
    Int(i64),
    /// Opaque 128-bit identifier.
    Guid(Uuid),
    /// String key.
    String(Arc<str>),
}

impl Key {
    /// Checks that this key can identify a row.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for an empty string key or the nil
    /// identifier.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::String(s) if s.is_empty() => {
                Err(Error::invalid_argument("key string must not be empty"))
            }
            Self::Guid(id) if id.is_nil() => {
                Err(Error::invalid_argument("key identifier must not be nil"))
            }
            _ => Ok(()),
        }
    }

    /// Returns the cell value this key is stored as.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::Int(*n),
            Self::Guid(id) => Value::Guid(*id),
            Self::String(s) => Value::String(Arc::clone(s)),
        }
    }
}

impl TryFrom<&Value> for Key {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        let key = match value {
            Value::Int(n) => Self::Int(*n),
            Value::Guid(id) => Self::Guid(*id),
            Value::String(s) => Self::String(Arc::clone(s)),
            Value::Null => return Err(Error::invalid_argument("key must not be null")),
            other => {
                return Err(Error::invalid_argument(format!(
                    "{} values cannot be used as keys",
                    other.value_type()
                )));
            }
        };
        key.validate()?;
        Ok(key)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        key.to_value()
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<Uuid> for Key {
    fn from(id: Uuid) -> Self {
        Self::Guid(id)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Guid(id) => write!(f, "{id}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}
