//! Shared fixtures: a payment entity linked to cards.

use rowlink_entity::{BusinessEntity, EntityConfig, XLinkCollection, XLinkSpec};
use rowlink_foundation::{Type, Value};
use rowlink_storage::{ColumnSchema, RowStore, TableSchema};

pub fn store() -> RowStore {
    let mut store = RowStore::new()
        .with_table(
            TableSchema::new("payment")
                .with_primary_key("id", Type::Int)
                .with_column(ColumnSchema::new("amount", Type::Decimal)),
        )
        .unwrap()
        .with_table(
            TableSchema::new("payment_card")
                .with_column(ColumnSchema::new("payment_id", Type::Int))
                .with_column(ColumnSchema::new("card_id", Type::Int)),
        )
        .unwrap()
        .with_table(
            TableSchema::new("card")
                .with_primary_key("id", Type::Int)
                .with_column(ColumnSchema::new("name", Type::String)),
        )
        .unwrap()
        .with_table(
            TableSchema::new("payment_line")
                .with_primary_key("id", Type::Int)
                .with_column(ColumnSchema::new("payment_id", Type::Int))
                .with_column(ColumnSchema::new("text", Type::String)),
        )
        .unwrap();

    let cards = store.table_mut("card").unwrap();
    cards.insert([("id", Value::Int(1)), ("name", Value::from("Visa"))]).unwrap();
    cards.insert([("id", Value::Int(2)), ("name", Value::from("MasterCard"))]).unwrap();
    store
}

pub fn card_spec() -> XLinkSpec {
    XLinkSpec::new("payment_card", "card", "payment_id", "card_id")
}

/// A saved payment with one link to card 1 (Visa).
pub fn payment_with_visa(config: EntityConfig) -> (BusinessEntity, XLinkCollection) {
    let mut entity = BusinessEntity::create(store(), "payment", [("id", 100)], config).unwrap();
    let mut cards = XLinkCollection::load(card_spec(), &entity).unwrap();
    cards.add_link(&mut entity, 1).unwrap();
    entity.accept_changes();
    (entity, cards)
}

pub fn card_count(entity: &BusinessEntity) -> usize {
    entity.store().table("card").unwrap().len()
}

pub fn link_count(entity: &BusinessEntity) -> usize {
    entity.store().table("payment_card").unwrap().len()
}
