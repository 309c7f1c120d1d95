//! Change notification.
//!
//! Entities and collections hold observer lists instead of references back
//! to their owners. Events are delivered synchronously, in subscription
//! order.

use std::fmt;
use std::sync::Arc;

use rowlink_storage::RowId;

/// A change to an entity's data or a collection's membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Rows of a table were written, inserted, or deleted.
    DataChanged {
        /// The table that changed.
        table: Arc<str>,
    },
    /// A row became an item of a collection.
    ItemAdded {
        /// The collection's table.
        table: Arc<str>,
        /// The new item row.
        row: RowId,
    },
    /// A row stopped being an item of a collection.
    ItemRemoved {
        /// The collection's table.
        table: Arc<str>,
        /// The removed item row.
        row: RowId,
    },
}

impl ChangeEvent {
    /// Returns the table the event concerns.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::DataChanged { table }
            | Self::ItemAdded { table, .. }
            | Self::ItemRemoved { table, .. } => table,
        }
    }
}

/// Receives change events.
pub trait ChangeObserver {
    /// Called once per event.
    fn on_change(&mut self, event: &ChangeEvent);
}

impl<F> ChangeObserver for F
where
    F: FnMut(&ChangeEvent),
{
    fn on_change(&mut self, event: &ChangeEvent) {
        self(event);
    }
}

/// An ordered list of observers.
#[derive(Default)]
pub(crate) struct Observers(Vec<Box<dyn ChangeObserver>>);

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.0.push(observer);
    }

    pub(crate) fn emit(&mut self, event: &ChangeEvent) {
        for observer in &mut self.0 {
            observer.on_change(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observers({})", self.0.len())
    }
}
