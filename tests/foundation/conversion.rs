//! Integration tests for typed conversion
//!
//! Tests `FromValue` for null cells, widening, and range checks.

use rowlink_foundation::{Decimal, FromValue, Type, Value};

#[test]
fn null_cells_read_as_zero() {
    assert_eq!(i64::from_cell(&Value::Null).unwrap(), 0);
    assert_eq!(String::from_cell(&Value::Null).unwrap(), "");
    assert_eq!(Decimal::from_cell(&Value::Null).unwrap(), Decimal::ZERO);
    assert!(!bool::from_cell(&Value::Null).unwrap());
}

#[test]
fn option_preserves_null() {
    assert_eq!(Option::<i64>::from_cell(&Value::Null).unwrap(), None);
    assert_eq!(Option::<i64>::from_cell(&Value::Int(4)).unwrap(), Some(4));
}

#[test]
fn decimal_reads_integers() {
    assert_eq!(Decimal::from_value(&Value::Int(5)).unwrap(), Decimal::from(5));
}

#[test]
fn i32_is_range_checked() {
    assert_eq!(i32::from_value(&Value::Int(7)).unwrap(), 7);
    assert!(i32::from_value(&Value::Int(i64::MAX)).is_err());
}

#[test]
fn declared_types() {
    assert_eq!(<i64 as FromValue>::TYPE, Type::Int);
    assert_eq!(<Decimal as FromValue>::TYPE, Type::Decimal);
    assert_eq!(<Value as FromValue>::TYPE, Type::Any);
}

#[test]
fn mismatched_values_fail() {
    assert!(i64::from_value(&Value::from("7")).is_err());
    assert!(String::from_value(&Value::Int(7)).is_err());
}
