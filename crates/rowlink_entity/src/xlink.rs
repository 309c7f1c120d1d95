//! Cross-link collections: master → link → target.
//!
//! Each item is a row of the link table. The link row holds the master key
//! and a foreign key naming a target row. The target row is resolved from
//! that foreign key on every access, through the target table's key index,
//! so reassigning the foreign key retargets the item immediately.
//!
//! Removing an item either unlinks it (the link row is deleted and the
//! target row is kept) or cascades (the target row is deleted as well). A
//! cascade is first offered to a [`RemovalGuard`], which may veto it.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use rowlink_foundation::{Error, ErrorKind, FromValue, Key, Result, Type, Value};
use rowlink_storage::{RowId, RowStore, Table};
use serde::{Deserialize, Serialize};

use crate::collection::{SubItemCollection, SubItemSpec, stored_form};
use crate::entity::BusinessEntity;
use crate::notify::ChangeObserver;

/// What an item removal deletes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalMode {
    /// Delete only the link row; the target row survives.
    #[default]
    LinkRecordOnly,
    /// Delete the link row and the target row it points at.
    LinkAndTargetRecord,
}

/// Which row of an item a field operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// The link row itself.
    LinkTable,
    /// The target row the link row points at.
    TargetTable,
}

/// Decides whether a cascade removal may delete a target row.
pub trait RemovalGuard {
    /// Returns false to veto deleting the item's target row.
    fn can_remove_target(&self, entity: &BusinessEntity, item: &XLinkItem) -> bool;
}

impl<F> RemovalGuard for F
where
    F: Fn(&BusinessEntity, &XLinkItem) -> bool,
{
    fn can_remove_target(&self, entity: &BusinessEntity, item: &XLinkItem) -> bool {
        self(entity, item)
    }
}

/// A guard that allows every cascade.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl RemovalGuard for AllowAll {
    fn can_remove_target(&self, _entity: &BusinessEntity, _item: &XLinkItem) -> bool {
        true
    }
}

/// The shape of a cross-link, shared by a collection and all its items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XLinkSpec {
    /// The link table.
    pub link_table: Arc<str>,
    /// The target table.
    pub target_table: Arc<str>,
    /// Link column holding the master key.
    pub master_column: Arc<str>,
    /// Link column holding the target key.
    pub target_column: Arc<str>,
    /// Target column the foreign key refers to. `None` means the target
    /// table's primary key.
    pub target_key_column: Option<Arc<str>>,
    /// Removal mode used when a removal call names none. `None` defers to
    /// the entity configuration.
    pub default_removal: Option<RemovalMode>,
}

impl XLinkSpec {
    /// Creates a spec whose foreign key refers to the target primary key.
    #[must_use]
    pub fn new(
        link_table: impl Into<Arc<str>>,
        target_table: impl Into<Arc<str>>,
        master_column: impl Into<Arc<str>>,
        target_column: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            link_table: link_table.into(),
            target_table: target_table.into(),
            master_column: master_column.into(),
            target_column: target_column.into(),
            target_key_column: None,
            default_removal: None,
        }
    }

    /// Sets the target column the foreign key refers to.
    #[must_use]
    pub fn with_target_key_column(mut self, column: impl Into<Arc<str>>) -> Self {
        self.target_key_column = Some(column.into());
        self
    }

    /// Sets the removal mode used when a call names none.
    #[must_use]
    pub const fn with_default_removal(mut self, mode: RemovalMode) -> Self {
        self.default_removal = Some(mode);
        self
    }

    /// Returns the target column the foreign key refers to.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if no column is configured and the
    /// target table has no primary key.
    pub fn key_column<'a>(&'a self, target: &'a Table) -> Result<&'a str> {
        self.target_key_column
            .as_deref()
            .or_else(|| target.primary_key())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "target table {} has no key column",
                    self.target_table
                ))
            })
    }

    /// Resolves a foreign-key value to a live target row.
    ///
    /// The value is converted to the key column's type first. Resolution
    /// goes through the key index when the key column is the primary key;
    /// duplicates resolve to the first inserted row.
    ///
    /// # Errors
    ///
    /// Returns a target not found error if no live row holds the key.
    pub fn resolve_target(&self, store: &RowStore, key: &Value) -> Result<RowId> {
        let target = store.table(&self.target_table)?;
        let column = self.key_column(target)?;
        let not_found = || Error::target_not_found(&*self.target_table, key.to_string());

        if key.is_null() {
            return Err(not_found());
        }
        let key = match target.column(column) {
            Some(schema) => schema
                .ty
                .coerce(key.clone())
                .ok()
                .or_else(|| whole_number(schema.ty, key))
                .ok_or_else(not_found)?,
            None => return Err(not_found()),
        };

        let found = if target.primary_key() == Some(column) {
            target.find_by_key(&key)
        } else {
            target.find_first(|row| row.get(column) == Some(&key))
        };
        found.ok_or_else(not_found)
    }

    fn resolve_mode(&self, requested: Option<RemovalMode>, entity: &BusinessEntity) -> RemovalMode {
        requested
            .or(self.default_removal)
            .unwrap_or(entity.config().default_removal)
    }
}

/// Narrows a whole-number decimal foreign key to an integer key column.
fn whole_number(ty: Type, key: &Value) -> Option<Value> {
    match (ty, key) {
        (Type::Int, Value::Decimal(d)) if d.fract().is_zero() => i64::try_from(*d).ok().map(Value::Int),
        _ => None,
    }
}

/// One link row of a cross-link collection.
#[derive(Clone)]
pub struct XLinkItem {
    link_row: RowId,
    spec: Arc<XLinkSpec>,
}

impl fmt::Debug for XLinkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XLinkItem")
            .field("link_table", &self.spec.link_table)
            .field("link_row", &self.link_row.index())
            .finish()
    }
}

impl XLinkItem {
    /// Wraps a link row.
    #[must_use]
    pub const fn new(link_row: RowId, spec: Arc<XLinkSpec>) -> Self {
        Self { link_row, spec }
    }

    /// Returns the link row id.
    #[must_use]
    pub const fn link_row(&self) -> RowId {
        self.link_row
    }

    /// Returns the shared link spec.
    #[must_use]
    pub fn spec(&self) -> &XLinkSpec {
        &self.spec
    }

    /// Reads the foreign key stored in the link row.
    ///
    /// # Errors
    ///
    /// Returns an error if the link row or the foreign-key column is missing.
    pub fn target_foreign_key(&self, entity: &BusinessEntity) -> Result<Value> {
        entity
            .store()
            .table(&self.spec.link_table)?
            .read_value(self.link_row, &self.spec.target_column)
    }

    /// Resolves the target row the link row currently points at.
    ///
    /// # Errors
    ///
    /// Returns a target not found error if the foreign key dangles.
    pub fn target_row(&self, entity: &BusinessEntity) -> Result<RowId> {
        let key = self.target_foreign_key(entity)?;
        self.spec.resolve_target(entity.store(), &key)
    }

    /// Points the link row at another target row.
    ///
    /// The target is resolved before anything is written; on failure the
    /// link row keeps its old foreign key.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for an empty or nil key, and a
    /// target not found error if no live target row holds the key.
    pub fn set_target_foreign_key(
        &self,
        entity: &mut BusinessEntity,
        key: impl Into<Key>,
    ) -> Result<()> {
        let key = key.into();
        key.validate()?;
        let value = key.to_value();
        self.spec
            .resolve_target(entity.store(), &value)
            .map_err(|e| e.in_operation("set_target_foreign_key"))?;

        entity.write_field(
            &self.spec.link_table,
            self.link_row,
            &self.spec.target_column,
            value,
            false,
        )?;
        debug!(
            "event=xlink_retargeted module=entity link_table={} row={} key={key}",
            self.spec.link_table,
            self.link_row.index()
        );
        Ok(())
    }

    /// Reads a field from the link row or its target row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be resolved or the read fails.
    pub fn get<T: FromValue>(
        &self,
        entity: &BusinessEntity,
        mode: AccessMode,
        field: &str,
    ) -> Result<T> {
        let (table, row) = self.address(entity, mode)?;
        entity.store().table(&table)?.read(row, field)
    }

    /// Reads a field from the link row or its target row, preserving null.
    ///
    /// # Errors
    ///
    /// Same as [`XLinkItem::get`].
    pub fn get_opt<T: FromValue>(
        &self,
        entity: &BusinessEntity,
        mode: AccessMode,
        field: &str,
    ) -> Result<Option<T>> {
        self.get::<Option<T>>(entity, mode, field)
    }

    /// Writes a field of the link row or its target row, returning whether
    /// the row became dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be resolved or the write fails.
    pub fn set(
        &self,
        entity: &mut BusinessEntity,
        mode: AccessMode,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<bool> {
        let (table, row) = self.address(entity, mode)?;
        entity.write_field(&table, row, field, value.into(), false)
    }

    /// Removes this item's rows. Callers go through
    /// [`XLinkCollection::remove`] so the collection detaches the item.
    ///
    /// With [`RemovalMode::LinkAndTargetRecord`] the guard is asked first;
    /// a veto returns `Ok(false)` and deletes nothing. The target row is
    /// deleted only if it still resolves. Other link rows pointing at the
    /// same target are left alone and become dangling.
    ///
    /// Fails if the link row is missing or already deleted. Nothing is
    /// deleted on error.
    pub(crate) fn remove(
        &self,
        entity: &mut BusinessEntity,
        mode: RemovalMode,
        guard: &dyn RemovalGuard,
    ) -> Result<bool> {
        let link_table = Arc::clone(&self.spec.link_table);
        self.check_live(entity)?;

        if mode == RemovalMode::LinkAndTargetRecord {
            if !guard.can_remove_target(entity, self) {
                info!(
                    "event=xlink_removed module=entity link_table={link_table} row={} mode={mode:?} status=rejected",
                    self.link_row.index()
                );
                return Ok(false);
            }
            if let Ok(target) = self.target_row(entity) {
                entity.delete_row(&self.spec.target_table, target)?;
            }
        }

        entity.delete_row(&link_table, self.link_row)?;
        info!(
            "event=xlink_removed module=entity link_table={link_table} row={} mode={mode:?} status=ok",
            self.link_row.index()
        );
        Ok(true)
    }

    fn check_live(&self, entity: &BusinessEntity) -> Result<()> {
        let table = entity.store().table(&self.spec.link_table)?;
        if table.row(self.link_row)?.is_deleted() {
            return Err(Error::new(ErrorKind::RowDeleted {
                table: self.spec.link_table.to_string(),
                row: self.link_row.index(),
            }));
        }
        Ok(())
    }

    fn address(&self, entity: &BusinessEntity, mode: AccessMode) -> Result<(Arc<str>, RowId)> {
        match mode {
            AccessMode::LinkTable => Ok((Arc::clone(&self.spec.link_table), self.link_row)),
            AccessMode::TargetTable => Ok((
                Arc::clone(&self.spec.target_table),
                self.target_row(entity)?,
            )),
        }
    }
}

/// The link rows belonging to an entity's master row.
pub struct XLinkCollection {
    spec: Arc<XLinkSpec>,
    base: SubItemCollection,
    guard: Box<dyn RemovalGuard>,
}

impl fmt::Debug for XLinkCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XLinkCollection")
            .field("spec", &self.spec)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl XLinkCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(spec: XLinkSpec) -> Self {
        let base = SubItemCollection::new(Self::base_spec(&spec));
        Self {
            spec: Arc::new(spec),
            base,
            guard: Box::new(AllowAll),
        }
    }

    /// Collects the live link rows pointing at the entity's master row.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no key or the link table is
    /// missing.
    pub fn load(spec: XLinkSpec, entity: &BusinessEntity) -> Result<Self> {
        let base = SubItemCollection::load(Self::base_spec(&spec), entity)?;
        Ok(Self {
            spec: Arc::new(spec),
            base,
            guard: Box::new(AllowAll),
        })
    }

    /// Sets the guard consulted before cascade removals.
    #[must_use]
    pub fn with_guard(mut self, guard: impl RemovalGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }

    /// Returns the shared link spec.
    #[must_use]
    pub fn spec(&self) -> &Arc<XLinkSpec> {
        &self.spec
    }

    /// Links an existing target row.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error for an empty or nil key, and a
    /// target not found error if no live target row holds the key. Nothing
    /// is inserted on error.
    pub fn add_link(&mut self, entity: &mut BusinessEntity, key: impl Into<Key>) -> Result<XLinkItem> {
        let key = key.into();
        key.validate()?;
        let value = key.to_value();
        self.spec
            .resolve_target(entity.store(), &value)
            .map_err(|e| e.in_operation("add_link"))?;

        let row = self
            .base
            .add_new(entity, [(Arc::clone(&self.spec.target_column), value)])?;
        debug!(
            "event=xlink_added module=entity link_table={} row={} key={key}",
            self.spec.link_table,
            row.index()
        );
        Ok(XLinkItem::new(row, Arc::clone(&self.spec)))
    }

    /// Inserts a target row holding `key` and links it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, the entity has no key, or the
    /// values do not fit the target table. Nothing is inserted on error.
    pub fn add_with_new_target<I, K, V>(
        &mut self,
        entity: &mut BusinessEntity,
        key: impl Into<Key>,
        values: I,
    ) -> Result<XLinkItem>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let key = key.into();
        key.validate()?;
        entity.key()?;

        let target = entity.store().table(&self.spec.target_table)?;
        let key_column: Arc<str> = self.spec.key_column(target)?.into();
        let mut cells: Vec<(Arc<str>, Value)> = values
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into()))
            .collect();
        cells.push((key_column, key.to_value()));

        entity.insert_row(&self.spec.target_table, cells)?;
        self.add_link(entity, key)
    }

    /// Returns the item at a position.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<XLinkItem> {
        self.base
            .row_at(index)
            .map(|row| XLinkItem::new(row, Arc::clone(&self.spec)))
    }

    /// Iterates items in order.
    pub fn items(&self) -> impl Iterator<Item = XLinkItem> + '_ {
        self.base
            .iter()
            .map(|row| XLinkItem::new(row, Arc::clone(&self.spec)))
    }

    /// Finds the first item whose foreign key equals `key`.
    #[must_use]
    pub fn find_by_target(&self, entity: &BusinessEntity, key: impl Into<Key>) -> Option<XLinkItem> {
        let links = entity.store().table(&self.spec.link_table).ok()?;
        let key = stored_form(links, &self.spec.target_column, key.into().to_value())?;
        self.items()
            .find(|item| item.target_foreign_key(entity).is_ok_and(|fk| fk == key))
    }

    /// Returns the foreign keys of all items, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a link row cannot be read.
    pub fn target_keys(&self, entity: &BusinessEntity) -> Result<Vec<Value>> {
        self.items()
            .map(|item| item.target_foreign_key(entity))
            .collect()
    }

    /// Removes the item stored in `row`.
    ///
    /// The mode falls back to the spec's default, then the entity
    /// configuration. Returns `Ok(false)` if the row is not an item or a
    /// cascade was vetoed.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows could not be deleted.
    pub fn remove(
        &mut self,
        entity: &mut BusinessEntity,
        row: RowId,
        mode: Option<RemovalMode>,
    ) -> Result<bool> {
        if !self.base.contains(row) {
            return Ok(false);
        }
        let mode = self.spec.resolve_mode(mode, entity);
        let item = XLinkItem::new(row, Arc::clone(&self.spec));
        let removed = item.remove(entity, mode, self.guard.as_ref())?;
        if removed {
            self.base.detach(row);
        }
        Ok(removed)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns true if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Registers an observer for membership events.
    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.base.subscribe(observer);
    }

    fn base_spec(spec: &XLinkSpec) -> SubItemSpec {
        SubItemSpec::new(Arc::clone(&spec.link_table), Arc::clone(&spec.master_column))
    }
}
