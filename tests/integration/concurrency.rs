//! Several threads writing to one port

use std::thread;

use scheme_writer::writer::Port;
use scheme_writer::{format, write_to_string, Heap, Value, WriteMode};

const THREADS: i64 = 4;
const ROUNDS: usize = 50;

#[test]
fn test_writes_do_not_interleave() {
    let mut heap = Heap::new();
    let lists: Vec<Value> = (0..THREADS)
        .map(|t| {
            let items: Vec<Value> = (0..20).map(|_| Value::Int(t)).collect();
            let list = heap.list(items);
            // Every list is cyclic so each write runs both passes
            let head = heap.cons(Value::Int(t), list);
            let mut last = list;
            while let Some(next) = heap.cdr(last).filter(|v| !v.is_nil()) {
                last = next;
            }
            heap.set_cdr(last, head).unwrap();
            head
        })
        .collect();
    let expected: Vec<String> = lists
        .iter()
        .map(|list| write_to_string(&heap, *list, WriteMode::Write, true).unwrap())
        .collect();

    let port = Port::string();
    thread::scope(|scope| {
        for list in &lists {
            let port = port.clone();
            let heap = &heap;
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    format(heap, &port, "~s;", &[*list], true).unwrap();
                }
            });
        }
    });

    let output = port.output_string().unwrap();
    let chunks: Vec<&str> = output.split_terminator(';').collect();
    assert_eq!(chunks.len(), THREADS as usize * ROUNDS);
    for chunk in chunks {
        assert!(expected.iter().any(|e| e == chunk), "interleaved: {}", chunk);
    }
}
