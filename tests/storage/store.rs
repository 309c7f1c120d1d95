//! Integration tests for RowStore
//!
//! Tests table registration and store-wide change tracking.

use rowlink_foundation::{ErrorKind, Type};
use rowlink_storage::{RowStore, TableSchema};

#[test]
fn store_registers_tables() {
    let mut store = RowStore::new();
    store
        .add_table(TableSchema::new("payment").with_primary_key("id", Type::Int))
        .unwrap();
    assert!(store.has_table("payment"));
    assert!(!store.has_table("card"));

    let err = store.add_table(TableSchema::new("payment")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateTable(_)));
}

#[test]
fn store_tracks_changes_across_tables() {
    let mut store = RowStore::new()
        .with_table(TableSchema::new("a").with_primary_key("id", Type::Int))
        .unwrap()
        .with_table(TableSchema::new("b").with_primary_key("id", Type::Int))
        .unwrap();
    store.table_mut("b").unwrap().insert([("id", 1)]).unwrap();
    assert!(store.has_changes());

    store.reject_changes();
    assert!(!store.has_changes());
    assert!(store.table("b").unwrap().is_empty());
}

#[test]
fn strict_store_rejects_unknown_columns() {
    let mut store = RowStore::new()
        .with_table(TableSchema::new("a").with_primary_key("id", Type::Int))
        .unwrap();
    store.set_auto_create_columns(false);
    let err = store
        .table_mut("a")
        .unwrap()
        .insert([("id", 1), ("extra", 2)])
        .unwrap_err();
    assert!(err.is_column_not_found());
}
