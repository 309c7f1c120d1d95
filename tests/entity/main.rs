//! Integration tests for Layer 2: Entity
//!
//! Tests for business entities, sub-item and cross-link collections,
//! removal semantics, persistence, and property access.

mod collections;
mod common;
mod properties;
mod removal;
