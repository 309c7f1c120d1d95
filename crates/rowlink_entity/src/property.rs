//! Named property access for presentation layers.
//!
//! Entities declare their fields with [`FieldDef`]s. A [`BoundEntity`]
//! exposes those fields through the [`Properties`] trait, and a
//! [`PropertyAdapter`] wraps any [`Properties`] with forgiving lookups:
//! unknown names read as null and ignore writes.

use std::sync::Arc;

use rowlink_foundation::{Error, Result, Type, Value};

use crate::entity::BusinessEntity;

/// Describes one property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: Arc<str>,
    /// Declared type.
    pub ty: Type,
    /// Whether writes are refused.
    pub read_only: bool,
}

/// Named, typed property access.
pub trait Properties {
    /// Lists the properties in declaration order.
    fn properties(&self) -> Vec<PropertyDescriptor>;

    /// Reads a property, or `None` if there is no such property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Writes a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the property is unknown, read-only, or the value
    /// does not fit its type.
    fn set_property(&mut self, name: &str, value: Value) -> Result<()>;
}

/// Maps a property to a master-row column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Property name.
    pub name: Arc<str>,
    /// Master-row column backing the property.
    pub column: Arc<str>,
    /// Declared type.
    pub ty: Type,
    /// Whether writes are refused.
    pub read_only: bool,
}

impl FieldDef {
    /// Creates a writable field.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, column: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            ty,
            read_only: false,
        }
    }

    /// Marks the field read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: Arc::clone(&self.name),
            ty: self.ty,
            read_only: self.read_only,
        }
    }
}

/// The declared fields of an entity shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityFields {
    fields: Vec<FieldDef>,
}

impl EntityFields {
    /// Creates an empty field list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Gets a field by property name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.fields.iter()
    }
}

/// An entity viewed through its declared fields.
#[derive(Debug)]
pub struct BoundEntity<'a> {
    entity: &'a mut BusinessEntity,
    fields: &'a EntityFields,
}

impl<'a> BoundEntity<'a> {
    /// Binds an entity to a field list.
    #[must_use]
    pub fn new(entity: &'a mut BusinessEntity, fields: &'a EntityFields) -> Self {
        Self { entity, fields }
    }
}

impl Properties for BoundEntity<'_> {
    fn properties(&self) -> Vec<PropertyDescriptor> {
        self.fields.iter().map(FieldDef::descriptor).collect()
    }

    fn property(&self, name: &str) -> Option<Value> {
        let field = self.fields.field(name)?;
        match self.entity.get_value(&field.column) {
            Ok(value) => Some(value),
            // Declared but never written
            Err(e) if e.is_column_not_found() => Some(Value::Null),
            Err(_) => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        let field = self
            .fields
            .field(name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown property {name}")))?;
        if field.read_only {
            return Err(Error::invalid_argument(format!("property {name} is read-only")));
        }
        let value = field.ty.coerce(value)?;
        self.entity.set(&field.column, value)?;
        Ok(())
    }
}

/// Forgiving property access over any [`Properties`].
#[derive(Debug)]
pub struct PropertyAdapter<P> {
    inner: P,
}

impl<P: Properties> PropertyAdapter<P> {
    /// Wraps a property source.
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source.
    #[must_use]
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Lists the property names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        self.inner.properties().into_iter().map(|p| p.name).collect()
    }

    /// Reads a property; unknown names read as null.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.inner.property(name).unwrap_or(Value::Null)
    }

    /// Writes a property. Returns `Ok(false)` without writing when the
    /// property is unknown or read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the property.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<bool> {
        match self.descriptor(name) {
            Some(d) if !d.read_only => {
                self.inner.set_property(name, value.into())?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Returns true if the property is read-only or unknown.
    #[must_use]
    pub fn is_read_only(&self, name: &str) -> bool {
        self.descriptor(name).is_none_or(|d| d.read_only)
    }

    /// Returns the declared type, or `Any` for unknown names.
    #[must_use]
    pub fn declared_type(&self, name: &str) -> Type {
        self.descriptor(name).map_or(Type::Any, |d| d.ty)
    }

    fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.inner
            .properties()
            .into_iter()
            .find(|p| &*p.name == name)
    }
}
