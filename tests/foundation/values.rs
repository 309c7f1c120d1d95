//! Integration tests for Value and Type
//!
//! Tests value construction, null semantics, equality, and coercion.

use std::collections::HashSet;

use rowlink_foundation::{Decimal, Type, Uuid, Value};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn value_from_primitives() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(7_i32), Value::Int(7));
    assert_eq!(Value::from("Visa").as_str(), Some("Visa"));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
}

#[test]
fn value_types() {
    assert_eq!(Value::Null.value_type(), Type::Null);
    assert_eq!(Value::from(Decimal::new(1, 0)).value_type(), Type::Decimal);
    assert_eq!(Value::from(Uuid::new_v4()).value_type(), Type::Guid);
}

// =============================================================================
// Null Semantics
// =============================================================================

#[test]
fn null_is_not_a_zero_value() {
    for ty in [Type::Bool, Type::Int, Type::Decimal, Type::Float, Type::String, Type::Guid] {
        assert_ne!(ty.zero_value(), Value::Null, "{ty}");
    }
    assert_eq!(Type::Any.zero_value(), Value::Null);
}

#[test]
fn every_type_accepts_null() {
    for ty in [Type::Int, Type::String, Type::Guid, Type::Any] {
        assert_eq!(ty.coerce(Value::Null).unwrap(), Value::Null);
    }
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn decimal_scale_does_not_affect_equality() {
    let a = Value::from(Decimal::new(4250, 2));
    let b = Value::from(Decimal::new(425, 1));
    assert_eq!(a, b);

    let set: HashSet<Value> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn numeric_kinds_are_distinct_values() {
    assert_ne!(Value::Int(1), Value::from(Decimal::ONE));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn numeric_values_order_across_kinds() {
    assert!(Value::Int(1) < Value::Float(1.5));
    assert!(Value::from(Decimal::new(25, 1)) > Value::Int(2));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn int_widens_to_decimal_and_float() {
    assert_eq!(
        Type::Decimal.coerce(Value::Int(42)).unwrap(),
        Value::from(Decimal::from(42))
    );
    assert_eq!(Type::Float.coerce(Value::Int(2)).unwrap(), Value::Float(2.0));
}

#[test]
fn strings_parse_into_guids() {
    let id = Uuid::new_v4();
    let coerced = Type::Guid.coerce(Value::from(id.to_string())).unwrap();
    assert_eq!(coerced, Value::Guid(id));
    assert!(Type::Guid.coerce(Value::from("not-a-guid")).is_err());
}

#[test]
fn incompatible_values_are_rejected() {
    assert!(Type::Int.coerce(Value::from("12")).is_err());
    assert!(Type::Bool.coerce(Value::Int(1)).is_err());
    assert!(Type::Decimal.coerce(Value::Float(f64::NAN)).is_err());
}
