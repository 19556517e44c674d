//! JSON conversion tests

use serde_json::json;

use crate::runtime::value::{Heap, Value};

#[test]
fn test_scalars() {
    let mut heap = Heap::new();
    assert_eq!(heap.from_json(&json!(null)), Value::Nil);
    assert_eq!(heap.from_json(&json!(true)), Value::TRUE);
    assert_eq!(heap.from_json(&json!(-12)), Value::Int(-12));
    assert_eq!(heap.from_json(&json!("#\\a")), Value::Char('a'));

    let f = heap.from_json(&json!(1.5));
    assert!(heap.as_number(f).is_some());

    let big = heap.from_json(&json!(u64::MAX));
    assert_eq!(heap.exact_integer(big).unwrap().to_string(), u64::MAX.to_string());
}

#[test]
fn test_strings_and_symbols() {
    let mut heap = Heap::new();
    let sym = heap.from_json(&json!("'foo"));
    assert_eq!(heap.symbol_name(sym), Some("foo"));

    let s = heap.from_json(&json!("plain"));
    assert_eq!(heap.as_string(s).unwrap().as_str(), Some("plain"));

    // A lone quote is a string, not an empty symbol
    let quote = heap.from_json(&json!("'"));
    assert!(heap.as_string(quote).is_some());
}

#[test]
fn test_arrays_and_objects() {
    let mut heap = Heap::new();
    let list = heap.from_json(&json!([1, [2, 3]]));
    let items = heap.list_to_vec(list).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], Value::Int(1));
    assert_eq!(heap.list_to_vec(items[1]), Some(vec![Value::Int(2), Value::Int(3)]));

    let alist = heap.from_json(&json!({"a": 1}));
    let entries = heap.list_to_vec(alist).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(heap.symbol_name(heap.car(entries[0]).unwrap()), Some("a"));
    assert_eq!(heap.cdr(entries[0]), Some(Value::Int(1)));
}
