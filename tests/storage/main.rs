//! Integration tests for Layer 1: Storage
//!
//! Tests for tables, the key index, typed field access, and change tracking.

mod changes;
mod store;
