//! Immediate value tests

use crate::runtime::value::{Handle, Value};

#[test]
fn test_immediates() {
    assert!(Value::TRUE.is_immediate());
    assert!(Value::Nil.is_immediate());
    assert!(Value::Char('a').is_immediate());
    assert!(Value::Int(-7).is_immediate());
    assert!(!Value::Heap(Handle::new(0)).is_immediate());
}

#[test]
fn test_default_is_nil() {
    assert_eq!(Value::default(), Value::Nil);
    assert!(Value::default().is_nil());
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Int(42).as_int(), Some(42));
    assert_eq!(Value::Char('x').as_char(), Some('x'));
    assert_eq!(Value::FALSE.as_bool(), Some(false));
    assert_eq!(Value::Heap(Handle::new(3)).as_handle(), Some(Handle::new(3)));

    assert!(Value::Int(1).as_char().is_none());
    assert!(Value::Nil.as_handle().is_none());
}

#[test]
fn test_only_false_is_false() {
    assert!(Value::FALSE.is_false());
    assert!(!Value::Nil.is_false());
    assert!(!Value::Int(0).is_false());
}

#[test]
fn test_conversions() {
    assert_eq!(Value::from(true), Value::TRUE);
    assert_eq!(Value::from(5i32), Value::Int(5));
    assert_eq!(Value::from(5i64), Value::Int(5));
    assert_eq!(Value::from('q'), Value::Char('q'));
    assert_eq!(Value::from(Handle::new(9)), Value::Heap(Handle::new(9)));
}

#[test]
fn test_display_is_shallow() {
    assert_eq!(Value::TRUE.to_string(), "#t");
    assert_eq!(Value::Nil.to_string(), "()");
    assert_eq!(Value::Eof.to_string(), "#<eof>");
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::Heap(Handle::new(2)).to_string(), "#<handle@2>");
}
