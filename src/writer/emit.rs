//! Emit pass
//!
//! Produces the printed form of a value. When the port carries a shared
//! table (the emit pass of a shared write), objects flagged by the walk pass
//! get a `#N=` label on first output and print as `#N#` afterwards.
//!
//! Also home of the built-in printers for strings, symbols and numbers,
//! which the class registry installs on the corresponding classes.

use super::context::WriteContext;
use super::error::{WriteError, WriteResult};
use super::port::Port;
use super::tracker::TrackState;
use crate::runtime::value::{Handle, Heap, HeapObject, Value};

/// Names of the characters 0x00 to 0x20
const CHAR_NAMES: [&str; 33] = [
    "null", "x01", "x02", "x03", "x04", "x05", "x06", "x07", "x08", "tab", "newline", "x0b", "x0c",
    "return", "x0e", "x0f", "x10", "x11", "x12", "x13", "x14", "x15", "x16", "x17", "x18", "x19",
    "x1a", "escape", "x1c", "x1d", "x1e", "x1f", "space",
];

// ============================================================================
// Emit pass
// ============================================================================

/// Write `value` to `port`
pub(crate) fn emit(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    if limit_reached(port, ctx) {
        return Ok(());
    }

    let handle = match value {
        Value::Heap(handle) => handle,
        immediate => return write_immediate(immediate, port, ctx),
    };
    let object = heap.get(handle).ok_or(WriteError::InvalidHandle(handle))?;

    // Never labelled
    match object {
        HeapObject::Number(_) | HeapObject::Symbol(_) => {
            return write_general(heap, value, port, ctx)
        }
        HeapObject::String(s) if s.is_empty() => return write_general(heap, value, port, ctx),
        HeapObject::Vector(items) if items.is_empty() => return port.put_str("#()"),
        _ => {}
    }

    if emit_label(port, handle)? {
        return Ok(());
    }

    match object {
        HeapObject::Pair { car, cdr } => emit_pair(heap, *car, *cdr, port, ctx),
        HeapObject::Vector(items) => {
            port.put_str("#(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    port.put_char(' ')?;
                }
                emit(heap, *item, port, ctx)?;
            }
            port.put_char(')')
        }
        _ => write_general(heap, value, port, ctx),
    }
}

/// Print `#N#` for an object already labelled and report true, or print
/// `#N=` for a shared object seen for the first time.
fn emit_label(
    port: &Port,
    handle: Handle,
) -> WriteResult<bool> {
    let label = port
        .with_table(|table| match table.probe(handle) {
            TrackState::Assigned(n) => Some((n, true)),
            TrackState::Shared => Some((table.assign_index(handle), false)),
            TrackState::Unmarked | TrackState::MarkedOnce => None,
        })
        .flatten();
    match label {
        Some((n, true)) => {
            port.put_str(&format!("#{}#", n))?;
            Ok(true)
        }
        Some((n, false)) => {
            port.put_str(&format!("#{}=", n))?;
            Ok(false)
        }
        None => Ok(false),
    }
}

fn emit_pair(
    heap: &Heap,
    car: Value,
    cdr: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    if let Some(prefix) = quote_prefix(heap, car) {
        if let Some((arg, Value::Nil)) = pair_parts(heap, cdr) {
            // A labelled cdr would lose its label in the abbreviated form
            if !is_shared(port, cdr) {
                port.put_str(prefix)?;
                return emit(heap, arg, port, ctx);
            }
        }
    }

    port.put_char('(')?;
    let (mut car, mut cdr) = (car, cdr);
    loop {
        emit(heap, car, port, ctx)?;

        if cdr.is_nil() {
            return port.put_char(')');
        }
        let next = match pair_parts(heap, cdr) {
            Some(next) if !is_shared(port, cdr) => next,
            _ => {
                port.put_str(" . ")?;
                emit(heap, cdr, port, ctx)?;
                return port.put_char(')');
            }
        };
        // Long and unlabelled cyclic lists end here
        if limit_reached(port, ctx) {
            return Ok(());
        }
        port.put_char(' ')?;
        (car, cdr) = next;
    }
}

fn write_immediate(
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    match value {
        Value::Boolean(false) => port.put_str("#f"),
        Value::Boolean(true) => port.put_str("#t"),
        Value::Nil => port.put_str("()"),
        Value::Eof => port.put_str("#<eof>"),
        Value::Undefined => port.put_str("#<undef>"),
        Value::Unbound => port.put_str("#<unbound>"),
        Value::Int(i) => port.put_str(&i.to_string()),
        Value::Char(c) => {
            if !ctx.mode.is_readable() {
                return port.put_char(c);
            }
            port.put_str("#\\")?;
            match c as u32 {
                code @ 0..=0x20 => port.put_str(CHAR_NAMES[code as usize]),
                0x7f => port.put_str("del"),
                _ => port.put_char(c),
            }
        }
        Value::Heap(handle) => Err(WriteError::InvalidHandle(handle)),
    }
}

/// Check the output limit. Callers stop with output still pending, so a
/// reached limit marks the port truncated.
fn limit_reached(
    port: &Port,
    ctx: &WriteContext,
) -> bool {
    let reached = ctx.is_limited()
        && port
            .current_length()
            .map_or(false, |length| length >= ctx.limit);
    if reached {
        port.mark_truncated();
    }
    reached
}

fn is_shared(
    port: &Port,
    value: Value,
) -> bool {
    match value {
        Value::Heap(handle) => port
            .with_table(|table| table.is_shared(handle))
            .unwrap_or(false),
        _ => false,
    }
}

fn pair_parts(
    heap: &Heap,
    value: Value,
) -> Option<(Value, Value)> {
    match heap.object(value) {
        Some(HeapObject::Pair { car, cdr }) => Some((*car, *cdr)),
        _ => None,
    }
}

fn quote_prefix(
    heap: &Heap,
    head: Value,
) -> Option<&'static str> {
    match heap.symbol_name(head)? {
        "quote" => Some("'"),
        "quasiquote" => Some("`"),
        "unquote" => Some(","),
        "unquote-splicing" => Some(",@"),
        _ => None,
    }
}

// ============================================================================
// Class dispatch
// ============================================================================

/// Print through the class printer, falling back to `write_object`
pub fn write_general(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let class = heap.classes().get(heap.class_of(value));
    match class.and_then(|class| class.printer()) {
        Some(printer) => printer(heap, value, port, ctx),
        None => write_object(heap, value, port, ctx),
    }
}

/// Generic fallback printer: the class's `write-object` specialization, or
/// `#<name 0xADDR>` where ADDR is the heap index of the object.
pub fn write_object(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let class = heap.classes().get(heap.class_of(value));
    if let Some(method) = class.and_then(|class| class.write_object()) {
        return method(heap, value, port, ctx);
    }
    let name = class.map_or("object", |class| class.bare_name());
    let address = value.as_handle().map_or(0, |handle| handle.raw());
    port.put_str(&format!("#<{} 0x{:x}>", name, address))
}

// ============================================================================
// Built-in printers
// ============================================================================

/// Printer of `<string>`
pub fn print_string(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let string = match heap.as_string(value) {
        Some(string) => string,
        None => return write_object(heap, value, port, ctx),
    };

    if !ctx.mode.is_readable() {
        return match string.as_str() {
            Some(s) => port.put_str(s),
            None => port.put_bytes(string.as_bytes()),
        };
    }

    port.put_char('"')?;
    match string.as_str() {
        Some(s) => {
            for c in s.chars() {
                match escape(c as u32) {
                    Some(escaped) => port.put_str(escaped)?,
                    None => port.put_char(c)?,
                }
            }
        }
        None => {
            for byte in string.as_bytes() {
                match escape(u32::from(*byte)) {
                    Some(escaped) => port.put_str(escaped)?,
                    None => port.put_bytes(std::slice::from_ref(byte))?,
                }
            }
        }
    }
    port.put_char('"')
}

fn escape(code: u32) -> Option<&'static str> {
    match code {
        0x5c => Some("\\\\"),
        0x22 => Some("\\\""),
        0x0a => Some("\\n"),
        0x09 => Some("\\t"),
        0x0d => Some("\\r"),
        0x0c => Some("\\f"),
        0x00 => Some("\\0"),
        _ => None,
    }
}

/// Printer of `<symbol>`
pub fn print_symbol(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let name = match heap.symbol_name(value) {
        Some(name) => name,
        None => return write_object(heap, value, port, ctx),
    };
    if !ctx.mode.is_readable() || !needs_bars(name) {
        return port.put_str(name);
    }
    port.put_char('|')?;
    for c in name.chars() {
        if c == '|' || c == '\\' {
            port.put_char('\\')?;
        }
        port.put_char(c)?;
    }
    port.put_char('|')
}

/// Check whether a symbol name would read back as something else
fn needs_bars(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return true,
    };
    if first == '#' {
        return true;
    }
    let starts_numeric = first.is_ascii_digit()
        || (matches!(first, '+' | '-' | '.')
            && chars.next().map_or(false, |c| c.is_ascii_digit()));
    starts_numeric
        || name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '(' | ')' | '"' | '\'' | '`' | ',' | ';' | '|' | '\\')
        })
}

/// Printer of the number classes
pub fn print_number(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    if let Value::Int(i) = value {
        return port.put_str(&i.to_string());
    }
    match heap.as_number(value) {
        Some(number) => port.put_str(&number.to_string_radix(10, false)),
        None => write_object(heap, value, port, ctx),
    }
}
