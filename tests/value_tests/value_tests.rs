//! Tests for Value
//!
//! These tests verify:
//! - Conversions into values
//! - Accessors
//! - JSON serialization through serde

use jsondb_client::Value;

// =============================================================================
// Conversion Tests
// =============================================================================

#[test]
fn test_from_primitives() {
    assert_eq!(Value::from("a"), Value::String("a".to_string()));
    assert_eq!(Value::from(String::from("b")), Value::String("b".to_string()));
    assert_eq!(Value::from(7i64), Value::Integer(7));
    assert_eq!(Value::from(7i32), Value::Integer(7));
    assert_eq!(Value::from(7u32), Value::Integer(7));
    assert_eq!(Value::from(0.5), Value::Float(0.5));
    assert_eq!(Value::from(true), Value::Bool(true));
}

#[test]
fn test_from_option() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}

#[test]
fn test_object_and_array_builders() {
    let object = Value::object([("a", 1i64), ("b", 2i64)]);
    assert_eq!(
        object,
        Value::Object(vec![
            ("a".to_string(), Value::Integer(1)),
            ("b".to_string(), Value::Integer(2)),
        ])
    );

    let array = Value::array([true, false]);
    assert_eq!(array, Value::Array(vec![Value::Bool(true), Value::Bool(false)]));
}

// =============================================================================
// Accessor Tests
// =============================================================================

#[test]
fn test_accessors() {
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::Integer(3).as_i64(), Some(3));
    assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
    assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
    assert_eq!(Value::Float(1.5).as_i64(), None);
    assert_eq!(Value::Bool(false).as_bool(), Some(false));
    assert!(Value::Null.is_null());
    assert!(!Value::from("null").is_null());
}

#[test]
fn test_object_get() {
    let object = Value::object([("k", "first"), ("k", "second"), ("other", "x")]);
    assert_eq!(object.get("k"), Some(&Value::from("first")));
    assert_eq!(object.get("missing"), None);
    assert_eq!(Value::from("not an object").get("k"), None);
}

#[test]
fn test_type_names() {
    assert_eq!(Value::from("s").type_name(), "string");
    assert_eq!(Value::Integer(1).type_name(), "integer");
    assert_eq!(Value::Float(1.0).type_name(), "float");
    assert_eq!(Value::Object(vec![]).type_name(), "object");
    assert_eq!(Value::Array(vec![]).type_name(), "array");
}

// =============================================================================
// Serde Tests
// =============================================================================

#[test]
fn test_serialize_keeps_insertion_order() {
    let value = Value::object([("zeta", 1i64), ("alpha", 2i64)]);
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"zeta":1,"alpha":2}"#);
}

#[test]
fn test_deserialize_numbers() {
    let value: Value = serde_json::from_str("[1, -1, 1.0, 18446744073709551615]").unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Integer(1),
            Value::Integer(-1),
            Value::Float(1.0),
            Value::Float(18446744073709551615.0),
        ])
    );
}

#[test]
fn test_deserialize_nested() {
    let value: Value = serde_json::from_str(r#"{"user":{"name":"ada","admin":false,"meta":null}}"#).unwrap();
    let user = value.get("user").unwrap();
    assert_eq!(user.get("name"), Some(&Value::from("ada")));
    assert_eq!(user.get("admin"), Some(&Value::Bool(false)));
    assert_eq!(user.get("meta"), Some(&Value::Null));
}

#[test]
fn test_display_is_json() {
    assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
    assert_eq!(Value::array([1i64, 2]).to_string(), "[1,2]");
    assert_eq!(Value::Null.to_string(), "null");
}
