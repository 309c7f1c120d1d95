//! Business entities over the rowlink row store.
//!
//! This crate provides:
//! - [`BusinessEntity`] - A row store with a designated master row
//! - [`SubItemCollection`] - Child rows referencing their parent by key
//! - [`XLinkCollection`] / [`XLinkItem`] - Master → link → target cross-links
//!   with unlink and cascade removal
//! - [`ChangeObserver`] - Synchronous change notification
//! - [`Persist`] - The durable-storage boundary, with an in-memory
//!   [`SnapshotPersister`]
//! - [`PropertyAdapter`] - Named property access over declared fields

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collection;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod notify;
pub mod persist;
pub mod property;
pub mod xlink;

pub use collection::{SubItemCollection, SubItemSpec};
pub use config::EntityConfig;
pub use entity::BusinessEntity;
pub use notify::{ChangeEvent, ChangeObserver};
pub use persist::{Persist, SnapshotPersister};
pub use property::{BoundEntity, EntityFields, FieldDef, Properties, PropertyAdapter, PropertyDescriptor};
pub use xlink::{AccessMode, AllowAll, RemovalGuard, RemovalMode, XLinkCollection, XLinkItem, XLinkSpec};
