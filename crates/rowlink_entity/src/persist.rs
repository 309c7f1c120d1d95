//! Durable-storage boundary.
//!
//! The entity layer never talks to storage itself; it hands itself to a
//! [`Persist`] implementation and commits pending changes only when that
//! succeeds.

use std::collections::HashMap;

use log::debug;
use rowlink_foundation::{Result, Value};
use rowlink_storage::RowStore;

use crate::diagnostics;
use crate::entity::BusinessEntity;

/// Saves and removes entities in durable storage.
pub trait Persist {
    /// Stores the entity's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity could not be stored.
    fn save(&mut self, entity: &BusinessEntity) -> Result<()>;

    /// Removes the entity. Its master row is already marked deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity could not be removed.
    fn remove(&mut self, entity: &BusinessEntity) -> Result<()>;
}

/// An in-memory persister that keeps a MessagePack snapshot of each saved
/// entity's store, keyed by the entity key.
#[derive(Clone, Debug, Default)]
pub struct SnapshotPersister {
    snapshots: HashMap<Value, Vec<u8>>,
    removed: Vec<Value>,
}

impl SnapshotPersister {
    /// Creates an empty persister.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored snapshot for a key.
    #[must_use]
    pub fn snapshot(&self, key: &Value) -> Option<&[u8]> {
        self.snapshots.get(key).map(Vec::as_slice)
    }

    /// Decodes the stored snapshot for a key.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the snapshot is corrupt.
    pub fn restore(&self, key: &Value) -> Result<Option<RowStore>> {
        self.snapshot(key).map(diagnostics::from_bytes).transpose()
    }

    /// Returns the keys of removed entities, in removal order.
    #[must_use]
    pub fn removed(&self) -> &[Value] {
        &self.removed
    }

    /// Returns the number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no snapshots are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Persist for SnapshotPersister {
    fn save(&mut self, entity: &BusinessEntity) -> Result<()> {
        let key = entity.key()?;
        let bytes = diagnostics::to_bytes(entity.store())?;
        debug!(
            "event=snapshot_stored module=persist table={} key={key} bytes={}",
            entity.master_table(),
            bytes.len()
        );
        self.snapshots.insert(key, bytes);
        Ok(())
    }

    fn remove(&mut self, entity: &BusinessEntity) -> Result<()> {
        // A master row added since the last accept is already gone and was
        // never stored.
        if let Ok(key) = entity.key() {
            self.snapshots.remove(&key);
            self.removed.push(key);
        }
        Ok(())
    }
}
