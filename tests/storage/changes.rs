//! Integration tests for change tracking
//!
//! Tests row states across writes, deletes, accept, and reject.

use rowlink_foundation::{Type, Value};
use rowlink_storage::{ColumnSchema, RowState, Table, TableSchema};

fn cards() -> Table {
    let mut table = Table::new(
        TableSchema::new("card")
            .with_primary_key("id", Type::Int)
            .with_column(ColumnSchema::new("name", Type::String)),
    );
    table.insert([("id", Value::Int(1)), ("name", Value::from("Visa"))]).unwrap();
    table.accept_changes();
    table
}

#[test]
fn accepted_rows_are_unchanged() {
    let table = cards();
    assert!(!table.has_changes());
    assert!(table.rows().all(|r| r.state() == RowState::Unchanged));
}

#[test]
fn deleting_an_added_row_drops_it() {
    let mut table = cards();
    let row = table.insert([("id", 2)]).unwrap();
    table.delete(row).unwrap();
    assert!(table.row(row).is_err());
    assert!(!table.has_changes());
}

#[test]
fn deleting_twice_fails() {
    let mut table = cards();
    let row = table.find_by_key(&Value::Int(1)).unwrap();
    table.delete(row).unwrap();
    assert_eq!(table.row(row).unwrap().state(), RowState::Deleted);
    assert!(table.delete(row).is_err());
}

#[test]
fn accept_purges_deleted_rows() {
    let mut table = cards();
    let row = table.find_by_key(&Value::Int(1)).unwrap();
    table.delete(row).unwrap();
    table.accept_changes();
    assert!(table.row(row).is_err());
    assert!(table.is_empty());
}

#[test]
fn reject_restores_everything() {
    let mut table = cards();
    let visa = table.find_by_key(&Value::Int(1)).unwrap();
    table.write(visa, "name", "Visa Gold", false).unwrap();
    table.write(visa, "id", 7, false).unwrap();
    let added = table.insert([("id", 2)]).unwrap();

    table.reject_changes();

    assert!(!table.has_changes());
    assert!(table.row(added).is_err());
    assert_eq!(table.read::<String>(visa, "name").unwrap(), "Visa");
    assert_eq!(table.find_by_key(&Value::Int(1)), Some(visa));
    assert!(table.find_by_key(&Value::Int(7)).is_none());
}

#[test]
fn reject_undeletes_rows() {
    let mut table = cards();
    let visa = table.find_by_key(&Value::Int(1)).unwrap();
    table.delete(visa).unwrap();
    table.reject_changes();
    assert!(table.contains(visa));
    assert_eq!(table.find_by_key(&Value::Int(1)), Some(visa));
}

#[test]
fn original_values_are_kept_until_accept() {
    let mut table = cards();
    let visa = table.find_by_key(&Value::Int(1)).unwrap();
    table.write(visa, "name", "Visa Gold", false).unwrap();

    let name = table.schema().columns.iter().position(|c| &*c.name == "name").unwrap();
    let row = table.row(visa).unwrap();
    assert_eq!(row.original_cell(name), Some(&Value::from("Visa")));
    assert_eq!(row.cell(name), Some(&Value::from("Visa Gold")));
}
