//! `%` printf directives

use super::self_loop;
use crate::runtime::value::{Heap, Value};
use crate::writer::{printf, printf_shared, Port, PrintfArg, WriteError, WriteResult};

fn run(
    heap: &Heap,
    fmt: &str,
    args: &[PrintfArg<'_>],
) -> WriteResult<String> {
    let port = Port::string();
    printf(heap, &port, fmt, args)?;
    Ok(port.take_output().unwrap_or_default())
}

fn one(
    fmt: &str,
    arg: impl Into<PrintfArg<'static>>,
) -> String {
    run(&Heap::new(), fmt, &[arg.into()]).unwrap()
}

#[test]
fn test_signed() {
    assert_eq!(one("%d", 42i64), "42");
    assert_eq!(one("%i", -7i64), "-7");
    assert_eq!(one("%5d|", 42i64), "   42|");
    assert_eq!(one("%-5d|", 42i64), "42   |");
    assert_eq!(one("%05d", -42i64), "-0042");
    assert_eq!(one("%+d", 5i64), "+5");
    assert_eq!(one("% d", 5i64), " 5");
    assert_eq!(one("%.3d", 7i64), "007");
    assert_eq!(one("%ld", i64::MIN), "-9223372036854775808");
}

#[test]
fn test_unsigned() {
    assert_eq!(one("%u", 3u32), "3");
    assert_eq!(one("%x", 255u32), "ff");
    assert_eq!(one("%X", 255u32), "FF");
    assert_eq!(one("%#x", 255u32), "0xff");
    assert_eq!(one("%#x", 0u32), "0");
    assert_eq!(one("%#o", 8u32), "010");
    assert_eq!(one("%08x", 48879u32), "0000beef");
    assert_eq!(one("%+u", 1u32), "1");
}

#[test]
fn test_chars_and_strings() {
    assert_eq!(one("%c", 'a'), "a");
    assert_eq!(one("%3c", 'a'), "  a");
    assert_eq!(one("%c", 65i64), "A");
    assert_eq!(one("%s", "hi"), "hi");
    assert_eq!(one("%5s|", "hi"), "hi   |");
    assert_eq!(one("%-5s|", "hi"), "hi   |");
}

#[test]
fn test_floats() {
    assert_eq!(one("%f", 3.14159), "3.141590");
    assert_eq!(one("%.2f", 3.14159), "3.14");
    assert_eq!(one("%8.3f", -1.5), "  -1.500");
    assert_eq!(one("%+.1f", 2.0), "+2.0");
    assert_eq!(one("%e", 12345.678), "1.234568e+04");
    assert_eq!(one("%.2E", 0.00123), "1.23E-03");
    assert_eq!(one("%g", 0.0001), "0.0001");
    assert_eq!(one("%g", 123456789.0), "1.23457e+08");
    assert_eq!(one("%g", 100.0), "100");
    assert_eq!(one("%#g", 100.0), "100.000");
    assert_eq!(one("%f", f64::INFINITY), "inf");
    assert_eq!(one("%G", f64::NAN), "NAN");
}

#[test]
fn test_pointer_and_percent() {
    let heap = Heap::new();
    assert_eq!(run(&heap, "%p", &[PrintfArg::Ptr(255)]).unwrap(), "0xff");
    assert_eq!(run(&heap, "100%%", &[]).unwrap(), "100%");
}

#[test]
fn test_values() {
    let mut heap = Heap::new();
    let s = heap.string("x");
    let list = heap.list([Value::Int(1), s]);
    let f = heap.flonum(0.5);

    assert_eq!(run(&heap, "%S", &[list.into()]).unwrap(), "(1 \"x\")");
    assert_eq!(run(&heap, "%A", &[list.into()]).unwrap(), "(1 x)");
    assert_eq!(run(&heap, "%s", &[s.into()]).unwrap(), "x");
    assert_eq!(run(&heap, "%d", &[Value::Int(9).into()]).unwrap(), "9");
    assert_eq!(run(&heap, "%.1f", &[f.into()]).unwrap(), "0.5");
    assert_eq!(run(&heap, "%C", &[Value::Char('z').into()]).unwrap(), "z");
}

#[test]
fn test_limited_values() {
    let mut heap = Heap::new();
    let items: Vec<Value> = (1..=5).map(Value::Int).collect();
    let long = heap.list(items);
    let short = heap.list([Value::Int(1), Value::Int(2)]);

    assert_eq!(run(&heap, "%10.5S", &[long.into()]).unwrap(), "(1 2 3 4 5 ...");
    assert_eq!(run(&heap, "%10.0S", &[long.into()]).unwrap(), "(1 2 3 4 5");
    assert_eq!(run(&heap, "%10.8S|", &[short.into()]).unwrap(), "(1 2)   |");

    // Cut off exactly at the width inside the list
    let three = heap.list([Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(run(&heap, "%3.2S|", &[three.into()]).unwrap(), "(1  ...|");
    assert_eq!(run(&heap, "%3.0S|", &[three.into()]).unwrap(), "(1 |");
}

#[test]
fn test_circular_values() {
    let mut heap = Heap::new();
    let list = self_loop(&mut heap);

    assert_eq!(run(&heap, "%#10.3S", &[list.into()]).unwrap(), "#0=(1 . #0 ...");
    assert_eq!(run(&heap, "%#S", &[list.into()]).unwrap(), "#0=(1 . #0#)");

    let port = Port::string();
    printf_shared(&heap, &port, "<%S>", &[list.into()]).unwrap();
    assert_eq!(port.output_string().unwrap(), "<#0=(1 . #0#)>");
}

#[test]
fn test_errors() {
    let heap = Heap::new();
    assert!(matches!(
        run(&heap, "%d", &["x".into()]),
        Err(WriteError::ArgumentType { directive: 'd', .. })
    ));
    assert!(matches!(
        run(&heap, "%S", &[PrintfArg::Int(1)]),
        Err(WriteError::ArgumentType { directive: 'S', .. })
    ));
    assert!(matches!(
        run(&heap, "%d %d", &[PrintfArg::Int(1)]),
        Err(WriteError::TooFewArguments { .. })
    ));
    assert!(matches!(
        run(&heap, "abc%", &[]),
        Err(WriteError::IncompleteDirective { .. })
    ));
    assert!(matches!(
        run(&heap, "%-5", &[]),
        Err(WriteError::IncompleteDirective { .. })
    ));
    assert!(matches!(
        run(&heap, "%q", &[PrintfArg::Int(1)]),
        Err(WriteError::IncompleteDirective { .. })
    ));
}

#[test]
fn test_leftover_arguments() {
    let heap = Heap::new();
    let port = Port::string();

    let err = printf(&heap, &port, "%d", &[PrintfArg::Int(1), PrintfArg::Int(2)]).unwrap_err();
    assert!(matches!(err, WriteError::TooManyArguments { .. }));
    assert_eq!(port.output_string().unwrap(), "1");
    assert!(matches!(
        run(&heap, "no directives", &["x".into()]),
        Err(WriteError::TooManyArguments { .. })
    ));
    assert_eq!(run(&heap, "%%", &[]).unwrap(), "%");
}
