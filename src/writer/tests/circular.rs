//! Shared and circular structure

use super::{self_loop, written, written_shared};
use crate::runtime::value::{Heap, Value};

#[test]
fn test_cyclic_list() {
    let mut heap = Heap::new();
    let list = self_loop(&mut heap);
    assert_eq!(written_shared(&heap, list), "#0=(1 . #0#)");
}

#[test]
fn test_cycle_through_tail() {
    let mut heap = Heap::new();
    let list = heap.list([Value::Int(1), Value::Int(2), Value::Int(3)]);
    let last = heap.cdr(heap.cdr(list).unwrap()).unwrap();
    heap.set_cdr(last, list).unwrap();
    assert_eq!(written_shared(&heap, list), "#0=(1 2 3 . #0#)");
}

#[test]
fn test_shared_sublist() {
    let mut heap = Heap::new();
    let a = heap.intern("a");
    let b = heap.intern("b");
    let inner = heap.list([a, b]);
    let outer = heap.list([inner, inner]);

    assert_eq!(written_shared(&heap, outer), "(#0=(a b) #0#)");
    // Plain writes repeat shared structure
    assert_eq!(written(&heap, outer), "((a b) (a b))");
}

#[test]
fn test_shared_tail() {
    let mut heap = Heap::new();
    let tail = heap.list([Value::Int(3), Value::Int(4)]);
    let first = heap.cons(Value::Int(1), tail);
    let second = heap.cons(Value::Int(2), tail);
    let list = heap.list([first, second]);

    assert_eq!(written_shared(&heap, list), "((1 . #0=(3 4)) (2 . #0#))");
}

#[test]
fn test_labels_in_output_order() {
    let mut heap = Heap::new();
    let x = heap.list([Value::Int(1)]);
    let y = heap.list([Value::Int(2)]);
    let list = heap.list([y, x, y, x]);

    assert_eq!(written_shared(&heap, list), "(#0=(2) #1=(1) #0# #1#)");
}

#[test]
fn test_self_quoting() {
    let mut heap = Heap::new();
    let quote = heap.intern("quote");
    let form = heap.list([quote, Value::Nil]);
    let arg = heap.cdr(form).unwrap();
    heap.set_car(arg, form).unwrap();

    assert_eq!(written_shared(&heap, form), "#0='#0#");
}

#[test]
fn test_shared_quote_argument_keeps_label() {
    let mut heap = Heap::new();
    let quote = heap.intern("quote");
    let x = heap.intern("x");
    let arg = heap.list([x]);
    let form = heap.cons(quote, arg);
    let list = heap.list([form, arg]);

    assert_eq!(written_shared(&heap, list), "((quote . #0=(x)) #0#)");
    assert_eq!(written(&heap, list), "('x (x))");
}

#[test]
fn test_cyclic_vector() {
    let mut heap = Heap::new();
    let vector = heap.vector([Value::Int(1), Value::Nil]);
    heap.vector_set(vector, 1, vector).unwrap();

    assert_eq!(written_shared(&heap, vector), "#0=#(1 #0#)");
}

#[test]
fn test_shared_strings() {
    let mut heap = Heap::new();
    let s = heap.string("hi");
    let list = heap.list([s, s]);
    assert_eq!(written_shared(&heap, list), "(#0=\"hi\" #0#)");
}

#[test]
fn test_untracked_objects() {
    let mut heap = Heap::new();
    let sym = heap.intern("a");
    let empty = heap.string("");
    let no_items = heap.vector(Vec::<Value>::new());
    let big = heap.flonum(1.5);
    let list = heap.list([sym, sym, empty, empty, no_items, no_items, big, big]);

    assert_eq!(
        written_shared(&heap, list),
        "(a a \"\" \"\" #() #() 1.5 1.5)"
    );
}

#[test]
fn test_no_labels_without_sharing() {
    let mut heap = Heap::new();
    let inner = heap.vector([Value::Int(2)]);
    let list = heap.list([Value::Int(1), inner, Value::Char('c')]);
    assert_eq!(written_shared(&heap, list), "(1 #(2) #\\c)");
}

#[test]
fn test_repeated_shared_writes() {
    let mut heap = Heap::new();
    let list = self_loop(&mut heap);
    let port = crate::writer::Port::string();

    for _ in 0..3 {
        crate::writer::write_shared(&heap, list, &port, crate::writer::WriteMode::Write)
            .unwrap();
        port.put_char(' ').unwrap();
    }
    assert_eq!(
        port.output_string().unwrap(),
        "#0=(1 . #0#) #0=(1 . #0#) #0=(1 . #0#) "
    );
}
