//! Writing values built from JSON through the public API

use scheme_writer::writer::{IoSink, Port, WriteMode};
use scheme_writer::{write, write_circular, write_shared, write_to_string, Heap, Value};

fn from_json(
    heap: &mut Heap,
    json: &str,
) -> Value {
    let json: serde_json::Value = serde_json::from_str(json).unwrap();
    heap.from_json(&json)
}

#[test]
fn test_json_values() {
    let mut heap = Heap::new();
    let cases = [
        ("[1, 2.5, true, null]", "(1 2.5 #t ())"),
        ("[\"'define\", \"'x\", 10]", "(define x 10)"),
        ("[\"#\\\\a\", \"text\"]", "(#\\a \"text\")"),
        ("{\"a\": 1, \"b\": [2]}", "((a . 1) (b 2))"),
        ("[[\"'quote\", \"'x\"]]", "('x)"),
        ("18446744073709551615", "18446744073709551615"),
    ];
    for (json, expected) in cases {
        let value = from_json(&mut heap, json);
        let text = write_to_string(&heap, value, WriteMode::Write, false).unwrap();
        assert_eq!(text, expected, "{}", json);
    }
}

#[test]
fn test_display_of_json_values() {
    let mut heap = Heap::new();
    let value = from_json(&mut heap, "[\"a b\", \"#\\\\c\", \"'sym bol\"]");

    let written = write_to_string(&heap, value, WriteMode::Write, false).unwrap();
    let displayed = write_to_string(&heap, value, WriteMode::Display, false).unwrap();
    assert_eq!(written, "(\"a b\" #\\c |sym bol|)");
    assert_eq!(displayed, "(a b c sym bol)");
}

#[test]
fn test_io_sink() {
    let mut heap = Heap::new();
    let value = from_json(&mut heap, "[1, [2, 3]]");
    let port = Port::new(IoSink::new(Vec::new()));

    write(&heap, value, &port, WriteMode::Write).unwrap();
    port.put_char('\n').unwrap();
    port.flush().unwrap();

    // Sinks over io::Write keep no copy of the output
    assert_eq!(port.output_string(), None);
    assert_eq!(port.current_length(), None);
}

#[test]
fn test_cycle_built_after_conversion() {
    let mut heap = Heap::new();
    let value = from_json(&mut heap, "[\"'a\", \"'b\", \"'c\"]");
    let last = heap.cdr(heap.cdr(value).unwrap()).unwrap();
    heap.set_cdr(last, value).unwrap();

    let port = Port::string();
    write_shared(&heap, value, &port, WriteMode::Write).unwrap();
    assert_eq!(port.take_output().unwrap(), "#0=(a b c . #0#)");

    let count = write_circular(&heap, value, &port, WriteMode::Write, Some(8)).unwrap();
    assert_eq!(count, -1);
    assert_eq!(port.take_output().unwrap(), "#0=(a b ");
}

#[test]
fn test_port_clones_share_output() {
    let heap = Heap::new();
    let port = Port::string();
    let clone = port.clone();

    write(&heap, Value::Int(1), &port, WriteMode::Write).unwrap();
    write(&heap, Value::Int(2), &clone, WriteMode::Write).unwrap();

    assert!(port.same_port(&clone));
    assert!(!port.same_port(&Port::string()));
    assert_eq!(port.output_string().unwrap(), "12");
}
