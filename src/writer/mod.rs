//! Writer
//!
//! Turns runtime values into text. A plain write runs only the emit pass. A
//! shared (circular-safe) write first runs the walk pass over a throwaway
//! walker port to find shared structure, then moves the resulting table onto
//! the real port and runs the emit pass, which labels shared objects with
//! `#N=` and refers back to them with `#N#`.
//!
//! Every entry point holds the port lock for the whole logical write and
//! checks the pass state of the port first: a class printer that calls back
//! into the writer on the port it was handed joins the pass in progress.
//!
//! ```
//! use scheme_writer::runtime::value::{Heap, Value};
//! use scheme_writer::writer::{self, Port, WriteMode};
//!
//! let mut heap = Heap::new();
//! let list = heap.list([Value::Int(1), Value::Int(2)]);
//! heap.set_cdr(heap.cdr(list).unwrap(), list).unwrap();
//!
//! let port = Port::string();
//! writer::write_shared(&heap, list, &port, WriteMode::Write).unwrap();
//! assert_eq!(port.output_string().unwrap(), "#0=(1 2 . #0#)");
//! ```

pub mod context;
pub(crate) mod emit;
pub mod error;
pub mod format;
pub mod port;
pub mod printf;
pub mod tracker;
pub(crate) mod walk;

pub use context::{WriteContext, WriteFlags, WriteMode};
pub use emit::{print_number, print_string, print_symbol, write_general, write_object};
pub use error::{WriteError, WriteResult};
pub use format::format;
pub use port::{DiscardSink, IoSink, Port, PortLock, Sink, StringSink};
pub use printf::{printf, printf_shared, PrintfArg};
pub use tracker::{SharedTable, TrackState};

use tracing::{debug, trace};

use crate::runtime::value::{Heap, Value};
use port::{Pass, PassKind};

// ============================================================================
// Entry points
// ============================================================================

/// Write `value` to `port`
pub fn write(
    heap: &Heap,
    value: Value,
    port: &Port,
    mode: WriteMode,
) -> WriteResult<()> {
    port.ensure_open()?;
    let _lock = port.lock();
    dispatch(heap, value, port, &WriteContext::new(mode), false)
}

/// Write `value` to `port`, labelling shared and circular structure
pub fn write_shared(
    heap: &Heap,
    value: Value,
    port: &Port,
    mode: WriteMode,
) -> WriteResult<()> {
    port.ensure_open()?;
    let _lock = port.lock();
    let ctx = WriteContext::new(mode).with_flags(WriteFlags::CIRCULAR);
    dispatch(heap, value, port, &ctx, true)
}

/// Write at most `width` characters of `value` to `port`.
///
/// Returns the number of characters written, or -1 if the output was cut.
pub fn write_limited(
    heap: &Heap,
    value: Value,
    port: &Port,
    mode: WriteMode,
    width: usize,
) -> WriteResult<isize> {
    port.ensure_open()?;
    let ctx = WriteContext::limited(mode, width);
    let out = Port::string();
    emit::emit(heap, value, &out, &ctx)?;
    put_truncated(port, &out, width)
}

/// Circular-safe write. With a width the output is limited as in
/// [`write_limited`] and the same count is returned; without one the
/// result is 0.
pub fn write_circular(
    heap: &Heap,
    value: Value,
    port: &Port,
    mode: WriteMode,
    width: Option<usize>,
) -> WriteResult<isize> {
    port.ensure_open()?;
    let mut ctx = WriteContext::new(mode).with_flags(WriteFlags::CIRCULAR);
    match width.filter(|w| *w > 0) {
        Some(width) => {
            ctx = ctx.with_flags(WriteFlags::LIMITED);
            ctx.limit = width;
            let out = Port::string();
            write_ss(heap, value, &out, &ctx)?;
            put_truncated(port, &out, width)
        }
        None => {
            let _lock = port.lock();
            write_ss(heap, value, port, &ctx)?;
            Ok(0)
        }
    }
}

/// Printed form of `value` as a string
pub fn write_to_string(
    heap: &Heap,
    value: Value,
    mode: WriteMode,
    circular: bool,
) -> WriteResult<String> {
    let port = Port::string();
    if circular {
        write_shared(heap, value, &port, mode)?;
    } else {
        write(heap, value, &port, mode)?;
    }
    Ok(port.take_output().unwrap_or_default())
}

// ============================================================================
// Internals
// ============================================================================

/// Route a write according to the pass the port is in
pub(crate) fn dispatch(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
    shared: bool,
) -> WriteResult<()> {
    match port.pass_kind() {
        PassKind::Walk => walk::walk(heap, value, port, ctx),
        PassKind::Emit => emit::emit(heap, value, port, ctx),
        PassKind::Direct if shared => write_ss(heap, value, port, ctx),
        PassKind::Direct => emit::emit(heap, value, port, ctx),
    }
}

/// Two-pass shared write. The caller holds the port lock.
fn write_ss(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let walker = Port::walker();
    walk::walk(heap, value, &walker, ctx)?;
    let table = walker.take_table().unwrap_or_default();
    debug!(
        "walk pass done: {} object(s) tracked, {} shared",
        table.len(),
        table.shared_count()
    );

    let _pass = port.enter_pass(Pass::Emit(table));
    emit::emit(heap, value, port, ctx)
}

/// Copy the first `width` characters of `out` to `port`. Returns -1 if
/// anything was cut, either here or by the emit pass stopping at the limit.
fn put_truncated(
    port: &Port,
    out: &Port,
    width: usize,
) -> WriteResult<isize> {
    let bytes = out.take_bytes().unwrap_or_default();
    let count = port::char_count(&bytes);
    let stopped = out.take_truncated();
    if count > width || stopped {
        trace!("limited write truncated {} character(s) to {}", count, width);
        port.put_bytes(port::char_prefix(&bytes, width))?;
        Ok(-1)
    } else {
        port.put_bytes(&bytes)?;
        Ok(count as isize)
    }
}

#[cfg(test)]
mod tests;
