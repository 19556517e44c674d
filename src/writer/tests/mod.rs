//! Writer tests

mod circular;
mod printf;
mod tracker;

use crate::runtime::value::{Heap, Value};
use crate::writer::{write_to_string, WriteMode};

/// Printed form in write mode
fn written(
    heap: &Heap,
    value: Value,
) -> String {
    write_to_string(heap, value, WriteMode::Write, false).unwrap()
}

/// Printed form in display mode
fn displayed(
    heap: &Heap,
    value: Value,
) -> String {
    write_to_string(heap, value, WriteMode::Display, false).unwrap()
}

/// Printed form of a shared write
fn written_shared(
    heap: &Heap,
    value: Value,
) -> String {
    write_to_string(heap, value, WriteMode::Write, true).unwrap()
}

/// A one-element list whose cdr points back to itself: `#0=(1 . #0#)`
fn self_loop(heap: &mut Heap) -> Value {
    let list = heap.list([Value::Int(1)]);
    heap.set_cdr(list, list).unwrap();
    list
}
