//! Rowlink - Business-entity persistence over an in-memory row store
//!
//! This crate re-exports all layers of the rowlink system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: rowlink_entity     — Business entities, sub-item and cross-link collections
//! Layer 1: rowlink_storage    — Tables, rows, change tracking, typed field access
//! Layer 0: rowlink_foundation — Core types (Value, Type, Key, Error)
//! ```

pub use rowlink_entity as entity;
pub use rowlink_foundation as foundation;
pub use rowlink_storage as storage;
