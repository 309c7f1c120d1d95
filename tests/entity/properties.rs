//! Integration tests for property access
//!
//! Tests declared fields through `BoundEntity` and `PropertyAdapter`.

use rowlink_entity::{
    BoundEntity, EntityConfig, EntityFields, FieldDef, Properties, PropertyAdapter,
};
use rowlink_foundation::{Decimal, Type, Value};

use crate::common::payment_with_visa;

fn payment_fields() -> EntityFields {
    EntityFields::new()
        .with_field(FieldDef::new("Id", "id", Type::Int).read_only())
        .with_field(FieldDef::new("Amount", "amount", Type::Decimal))
        .with_field(FieldDef::new("Memo", "memo", Type::String))
}

#[test]
fn adapter_reads_and_writes_declared_fields() {
    let (mut entity, _) = payment_with_visa(EntityConfig::default());
    let fields = payment_fields();
    let mut adapter = PropertyAdapter::new(BoundEntity::new(&mut entity, &fields));

    assert_eq!(adapter.get("Id"), Value::Int(100));
    assert_eq!(adapter.get("Memo"), Value::Null);
    assert!(adapter.set("Memo", "rent").unwrap());
    assert!(adapter.set("Amount", 12).unwrap());
    drop(adapter);

    assert_eq!(entity.get::<String>("memo").unwrap(), "rent");
    assert_eq!(entity.get::<Decimal>("amount").unwrap(), Decimal::from(12));
    assert!(entity.is_dirty());
}

#[test]
fn adapter_defaults_for_unknown_properties() {
    let (mut entity, _) = payment_with_visa(EntityConfig::default());
    let fields = payment_fields();
    let mut adapter = PropertyAdapter::new(BoundEntity::new(&mut entity, &fields));

    assert_eq!(adapter.get("Nope"), Value::Null);
    assert!(!adapter.set("Nope", 1).unwrap());
    assert!(adapter.is_read_only("Nope"));
    assert_eq!(adapter.declared_type("Nope"), Type::Any);
}

#[test]
fn read_only_properties_ignore_writes() {
    let (mut entity, _) = payment_with_visa(EntityConfig::default());
    let fields = payment_fields();
    let mut adapter = PropertyAdapter::new(BoundEntity::new(&mut entity, &fields));

    assert!(!adapter.set("Id", 5).unwrap());
    assert_eq!(adapter.get("Id"), Value::Int(100));

    let mut bound = adapter.into_inner();
    assert!(bound.set_property("Id", Value::Int(5)).is_err());
}

#[test]
fn descriptors_follow_declaration_order() {
    let (mut entity, _) = payment_with_visa(EntityConfig::default());
    let fields = payment_fields();
    let bound = BoundEntity::new(&mut entity, &fields);
    let described: Vec<_> = bound
        .properties()
        .into_iter()
        .map(|d| (d.name.to_string(), d.ty, d.read_only))
        .collect();
    assert_eq!(
        described,
        vec![
            ("Id".to_string(), Type::Int, true),
            ("Amount".to_string(), Type::Decimal, false),
            ("Memo".to_string(), Type::String, false),
        ]
    );
}
