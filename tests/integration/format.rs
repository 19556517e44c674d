//! `format` and `printf` through the public API

use scheme_writer::writer::Port;
use scheme_writer::{format, printf, Heap, PrintfArg, Value, WriteError};

#[test]
fn test_report_line() {
    let mut heap = Heap::new();
    let name = heap.string("widgets");
    let port = Port::string();

    format(
        &heap,
        &port,
        "~10a|~8,'.:d|~@d~%",
        &[name, Value::Int(1234567), Value::Int(3)],
        false,
    )
    .unwrap();
    assert_eq!(port.output_string().unwrap(), "widgets   |1,234,567|+3\n");
}

#[test]
fn test_printf_mixed_arguments() {
    let mut heap = Heap::new();
    let list = heap.list([Value::Int(1), Value::Int(2)]);
    let port = Port::string();

    printf(
        &heap,
        &port,
        "%s=%S (%5.1f%%, %#x)",
        &[
            PrintfArg::Str("pair"),
            PrintfArg::Value(list),
            PrintfArg::Float(99.44),
            PrintfArg::UInt(4096),
        ],
    )
    .unwrap();
    assert_eq!(
        port.output_string().unwrap(),
        "pair=(1 2) ( 99.4%, 0x1000)"
    );
}

#[test]
fn test_errors_leave_partial_output() {
    let heap = Heap::new();
    let port = Port::string();

    let err = format(&heap, &port, "a~ab~a", &[Value::Int(1)], false).unwrap_err();
    assert!(matches!(err, WriteError::TooFewArguments { .. }));
    assert_eq!(port.output_string().unwrap(), "a1b");
}

#[test]
fn test_closed_port_rejected() {
    let heap = Heap::new();
    let port = Port::string();
    port.close().unwrap();

    assert!(matches!(
        format(&heap, &port, "x", &[], false),
        Err(WriteError::PortClosed)
    ));
    assert!(matches!(
        printf(&heap, &port, "x", &[]),
        Err(WriteError::PortClosed)
    ));
}
