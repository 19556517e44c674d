//! Walk pass
//!
//! Traverses a value and records every trackable object in the port's
//! [`SharedTable`](super::tracker::SharedTable) without producing output.
//! Objects reached a second time are flagged shared and not descended into
//! again, so the traversal terminates on cyclic data.
//!
//! Instances of user classes are walked by running their printer against the
//! walker port: when the printer writes substructure through the public entry
//! points, those calls land back here.

use super::context::WriteContext;
use super::emit;
use super::error::{WriteError, WriteResult};
use super::port::Port;
use crate::runtime::value::{Heap, HeapObject, Value};

/// Walk `value`, recording shared structure in the table of `port`
pub(crate) fn walk(
    heap: &Heap,
    value: Value,
    port: &Port,
    ctx: &WriteContext,
) -> WriteResult<()> {
    let mut obj = value;
    loop {
        let handle = match obj {
            Value::Heap(handle) => handle,
            _ => return Ok(()),
        };
        let object = heap.get(handle).ok_or(WriteError::InvalidHandle(handle))?;
        if !object.is_trackable() {
            return Ok(());
        }
        let seen = port
            .with_table(|table| table.revisit(handle))
            .unwrap_or(false);
        if seen {
            return Ok(());
        }

        match object {
            HeapObject::Pair { car, cdr } => {
                walk(heap, *car, port, ctx)?;
                obj = *cdr;
            }
            HeapObject::Vector(items) => {
                for item in items {
                    walk(heap, *item, port, ctx)?;
                }
                return Ok(());
            }
            HeapObject::Opaque(_) => return emit::write_general(heap, obj, port, ctx),
            HeapObject::String(_) | HeapObject::Symbol(_) | HeapObject::Number(_) => {
                return Ok(())
            }
        }
    }
}
