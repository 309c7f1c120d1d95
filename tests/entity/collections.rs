//! Integration tests for SubItemCollection
//!
//! Tests child rows keyed by their parent.

use std::cell::RefCell;
use std::rc::Rc;

use rowlink_entity::{BusinessEntity, ChangeEvent, EntityConfig, SubItemCollection, SubItemSpec};
use rowlink_foundation::Value;

use crate::common::store;

fn lines_spec() -> SubItemSpec {
    SubItemSpec::new("payment_line", "payment_id")
}

fn payment() -> BusinessEntity {
    let mut raw = store();
    let lines = raw.table_mut("payment_line").unwrap();
    lines.insert([("id", Value::Int(1)), ("payment_id", Value::Int(100)), ("text", Value::from("a"))]).unwrap();
    lines.insert([("id", Value::Int(2)), ("payment_id", Value::Int(200)), ("text", Value::from("b"))]).unwrap();
    lines.insert([("id", Value::Int(3)), ("payment_id", Value::Int(100)), ("text", Value::from("c"))]).unwrap();
    let mut entity =
        BusinessEntity::create(raw, "payment", [("id", 100)], EntityConfig::default()).unwrap();
    entity.accept_changes();
    entity
}

fn texts(lines: &SubItemCollection, entity: &BusinessEntity) -> Vec<String> {
    lines
        .iter()
        .map(|row| lines.get(entity, row, "text").unwrap())
        .collect()
}

#[test]
fn load_keeps_table_order() {
    let entity = payment();
    let lines = SubItemCollection::load(lines_spec(), &entity).unwrap();
    assert_eq!(texts(&lines, &entity), vec!["a", "c"]);
}

#[test]
fn add_and_remove() {
    let mut entity = payment();
    let mut lines = SubItemCollection::load(lines_spec(), &entity).unwrap();

    let row = lines.add_new(&mut entity, [("id", Value::Int(4)), ("text", Value::from("d"))]).unwrap();
    assert_eq!(texts(&lines, &entity), vec!["a", "c", "d"]);

    let first = lines.row_at(0).unwrap();
    assert!(lines.remove(&mut entity, first).unwrap());
    assert_eq!(texts(&lines, &entity), vec!["c", "d"]);
    assert!(lines.contains(row));

    let reloaded = SubItemCollection::load(lines_spec(), &entity).unwrap();
    assert_eq!(texts(&reloaded, &entity), vec!["c", "d"]);
}

#[test]
fn membership_events() {
    let mut entity = payment();
    let mut lines = SubItemCollection::load(lines_spec(), &entity).unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    lines.subscribe(Box::new(move |e: &ChangeEvent| sink.borrow_mut().push(e.clone())));

    let row = lines.add_new(&mut entity, [("id", 9)]).unwrap();
    lines.remove(&mut entity, row).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::ItemAdded { table: "payment_line".into(), row },
            ChangeEvent::ItemRemoved { table: "payment_line".into(), row },
        ]
    );
}

#[test]
fn failed_add_changes_nothing() {
    let mut entity = payment();
    let mut lines = SubItemCollection::load(lines_spec(), &entity).unwrap();
    assert!(lines.add_new(&mut entity, [("text", "no id")]).is_err());
    assert_eq!(lines.len(), 2);
    assert!(!entity.is_dirty());
}

#[test]
fn item_fields() {
    let mut entity = payment();
    let lines = SubItemCollection::load(lines_spec(), &entity).unwrap();
    let row = lines.row_at(1).unwrap();
    assert!(lines.set(&mut entity, row, "text", "changed").unwrap());
    assert_eq!(texts(&lines, &entity), vec!["a", "changed"]);
}
