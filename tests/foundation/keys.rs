//! Integration tests for Key
//!
//! Tests the three identifier kinds and their validation.

use rowlink_foundation::{ErrorKind, Key, Uuid, Value};

#[test]
fn keys_from_identifiers() {
    assert_eq!(Key::from(3_i32), Key::Int(3));
    assert_eq!(Key::from("vip").to_value(), Value::from("vip"));

    let id = Uuid::new_v4();
    assert_eq!(Value::from(Key::from(id)), Value::Guid(id));
}

#[test]
fn empty_and_nil_keys_are_invalid() {
    for key in [Key::from(""), Key::from(Uuid::nil())] {
        let err = key.validate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    }
    assert!(Key::Int(0).validate().is_ok());
}

#[test]
fn keys_from_values() {
    assert_eq!(Key::try_from(&Value::Int(9)).unwrap(), Key::Int(9));
    assert!(Key::try_from(&Value::Null).is_err());
    assert!(Key::try_from(&Value::Bool(true)).is_err());
    assert!(Key::try_from(&Value::from("")).is_err());
}

#[test]
fn key_display() {
    assert_eq!(format!("{}", Key::Int(12)), "12");
    assert_eq!(format!("{}", Key::from("abc")), "abc");
}
