//! Rows with pending-change tracking.
//!
//! A row keeps the cell values as of the last accept alongside its current
//! cells, so pending changes can be rejected. Cells are held in a persistent
//! vector, making that snapshot O(1).

use std::fmt;

use im::Vector;
use rowlink_foundation::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema::ColumnSchema;

/// Row identifier, unique within its table and never reused.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowId(u64);

impl RowId {
    /// Creates a row id from its raw index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index of this row id.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pending-change state of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RowState {
    /// Inserted since the last accept.
    Added,
    /// No pending changes.
    Unchanged,
    /// At least one cell written since the last accept.
    Modified,
    /// Marked for removal; dropped on the next accept.
    Deleted,
}

/// A single row of a table.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    id: RowId,
    /// Current cells by column ordinal. May be shorter than the schema when
    /// columns were added after the row was created.
    cells: Vector<Value>,
    /// Cells as of the last accept; `None` while they equal `cells`.
    original: Option<Vector<Value>>,
    state: RowState,
}

impl Row {
    pub(crate) fn new(id: RowId, cells: Vector<Value>) -> Self {
        Self {
            id,
            cells,
            original: None,
            state: RowState::Added,
        }
    }

    /// Returns the row id.
    #[must_use]
    pub const fn id(&self) -> RowId {
        self.id
    }

    /// Returns the pending-change state.
    #[must_use]
    pub const fn state(&self) -> RowState {
        self.state
    }

    /// Returns true if the row is marked deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.state == RowState::Deleted
    }

    /// Returns true if the row has pending changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state != RowState::Unchanged
    }

    /// Returns the stored cell at `ordinal`, if the row has one.
    #[must_use]
    pub fn cell(&self, ordinal: usize) -> Option<&Value> {
        self.cells.get(ordinal)
    }

    /// Returns the cell at `ordinal` as of the last accept.
    ///
    /// Added rows have no original version.
    #[must_use]
    pub fn original_cell(&self, ordinal: usize) -> Option<&Value> {
        match self.state {
            RowState::Added => None,
            _ => self.original.as_ref().unwrap_or(&self.cells).get(ordinal),
        }
    }

    /// Writes a cell, returning whether the row was marked dirty.
    ///
    /// An equal value only dirties the row when `force` is set. Missing
    /// cells up to `ordinal` are filled with their column's initial value.
    pub(crate) fn set_cell(
        &mut self,
        columns: &[ColumnSchema],
        ordinal: usize,
        value: Value,
        force: bool,
    ) -> bool {
        let changed = self.cells.get(ordinal).map_or_else(
            || columns.get(ordinal).map(ColumnSchema::initial_value) != Some(value.clone()),
            |current| *current != value,
        );
        if !changed && !force {
            return false;
        }

        if self.state == RowState::Unchanged {
            self.original = Some(self.cells.clone());
            self.state = RowState::Modified;
        }

        if changed {
            while self.cells.len() <= ordinal {
                let next = columns
                    .get(self.cells.len())
                    .map_or(Value::Null, ColumnSchema::initial_value);
                self.cells.push_back(next);
            }
            self.cells.set(ordinal, value);
        }
        true
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = RowState::Deleted;
    }

    pub(crate) fn accept(&mut self) {
        self.original = None;
        self.state = RowState::Unchanged;
    }

    pub(crate) fn reject(&mut self) {
        if let Some(original) = self.original.take() {
            self.cells = original;
        }
        self.state = RowState::Unchanged;
    }
}
