//! Integration tests for cross-link removal
//!
//! Tests unlink, cascade, guard vetoes, and mode defaulting.

use std::cell::Cell;
use std::rc::Rc;

use rowlink_entity::{BusinessEntity, EntityConfig, RemovalMode, XLinkCollection, XLinkItem};
use rowlink_foundation::{ErrorKind, Value};

use crate::common::{card_count, card_spec, link_count, payment_with_visa};

#[test]
fn unlink_leaves_target() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let row = cards.item(0).unwrap().link_row();

    assert!(cards.remove(&mut entity, row, Some(RemovalMode::LinkRecordOnly)).unwrap());
    assert_eq!(link_count(&entity), 0);
    assert_eq!(card_count(&entity), 2);
}

#[test]
fn cascade_removes_target() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let row = cards.item(0).unwrap().link_row();

    assert!(cards
        .remove(&mut entity, row, Some(RemovalMode::LinkAndTargetRecord))
        .unwrap());
    assert_eq!(link_count(&entity), 0);
    assert_eq!(card_count(&entity), 1);
}

#[test]
fn vetoed_cascade_is_all_or_nothing() {
    let (mut entity, cards) = payment_with_visa(EntityConfig::default());
    let asked = Rc::new(Cell::new(0));
    let counter = Rc::clone(&asked);
    let mut cards = cards.with_guard(move |_: &BusinessEntity, _: &XLinkItem| {
        counter.set(counter.get() + 1);
        false
    });
    let row = cards.item(0).unwrap().link_row();

    let removed = cards
        .remove(&mut entity, row, Some(RemovalMode::LinkAndTargetRecord))
        .unwrap();
    assert!(!removed);
    assert_eq!(asked.get(), 1);
    assert_eq!(link_count(&entity), 1);
    assert_eq!(card_count(&entity), 2);
    assert!(!entity.is_dirty());
}

#[test]
fn guard_sees_the_item_being_removed() {
    let (mut entity, cards) = payment_with_visa(EntityConfig::default());
    let mut cards = cards.with_guard(|entity: &BusinessEntity, item: &XLinkItem| {
        item.target_foreign_key(entity)
            .is_ok_and(|fk| fk != rowlink_foundation::Value::Int(1))
    });
    let row = cards.item(0).unwrap().link_row();
    assert!(!cards
        .remove(&mut entity, row, Some(RemovalMode::LinkAndTargetRecord))
        .unwrap());
}

#[test]
fn config_supplies_default_mode() {
    let config = EntityConfig::default().with_default_removal(RemovalMode::LinkAndTargetRecord);
    let (mut entity, mut cards) = payment_with_visa(config);
    let row = cards.item(0).unwrap().link_row();

    cards.remove(&mut entity, row, None).unwrap();
    assert_eq!(card_count(&entity), 1);
}

#[test]
fn spec_default_overrides_config() {
    let config = EntityConfig::default().with_default_removal(RemovalMode::LinkAndTargetRecord);
    let (mut entity, _) = payment_with_visa(config);
    let mut cards = XLinkCollection::load(
        card_spec().with_default_removal(RemovalMode::LinkRecordOnly),
        &entity,
    )
    .unwrap();
    let row = cards.item(0).unwrap().link_row();

    cards.remove(&mut entity, row, None).unwrap();
    assert_eq!(card_count(&entity), 2);
}

#[test]
fn cascade_with_dangling_target_still_unlinks() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let item = cards.item(0).unwrap();
    item.set(&mut entity, rowlink_entity::AccessMode::LinkTable, "card_id", 42)
        .unwrap();

    assert!(cards
        .remove(&mut entity, item.link_row(), Some(RemovalMode::LinkAndTargetRecord))
        .unwrap());
    assert_eq!(card_count(&entity), 2);
    assert_eq!(link_count(&entity), 0);
}

#[test]
fn removing_twice_is_a_no_op() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let row = cards.item(0).unwrap().link_row();

    assert!(cards.remove(&mut entity, row, None).unwrap());
    assert!(!cards.remove(&mut entity, row, None).unwrap());
}

#[test]
fn reject_restores_removed_rows() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let row = cards.item(0).unwrap().link_row();
    assert!(cards
        .remove(&mut entity, row, Some(RemovalMode::LinkAndTargetRecord))
        .unwrap());

    entity.reject_changes();
    assert_eq!(card_count(&entity), 2);
    assert_eq!(link_count(&entity), 1);
}

#[test]
fn removal_detaches_the_item() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let item = cards.add_link(&mut entity, 2).unwrap();

    assert!(cards
        .remove(&mut entity, item.link_row(), Some(RemovalMode::LinkRecordOnly))
        .unwrap());
    assert_eq!(cards.len(), 1);
    assert_eq!(cards.target_keys(&entity).unwrap(), vec![Value::Int(1)]);
    assert!(cards.find_by_target(&entity, 2).is_none());
}

#[test]
fn cascade_leaves_other_links_to_the_same_target_dangling() {
    let (mut entity, mut cards) = payment_with_visa(EntityConfig::default());
    let second = cards.add_link(&mut entity, 1).unwrap();
    let first = cards.item(0).unwrap().link_row();

    assert!(cards
        .remove(&mut entity, first, Some(RemovalMode::LinkAndTargetRecord))
        .unwrap());
    assert_eq!(card_count(&entity), 1);

    let links = entity.store().table("payment_card").unwrap();
    assert!(links.contains(second.link_row()));
    assert_eq!(cards.len(), 1);
    assert_eq!(second.target_foreign_key(&entity).unwrap(), Value::Int(1));
    let err = second.target_row(&entity).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TargetNotFound { .. }));
}
