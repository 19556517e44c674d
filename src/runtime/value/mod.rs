//! Core runtime types
//!
//! The value model: immediate values, the handle-based heap, heap object
//! variants, and the class registry that gives every object a type
//! descriptor.

pub mod class;
pub mod equal;
pub mod heap;
pub mod json;
pub mod number;
pub mod runtime_value;
pub mod string;

pub use class::{Class, ClassId, ClassRegistry, CompareFn, Printer};
pub use heap::{Handle, Heap, HeapError, HeapObject, OpaqueObject};
pub use number::Number;
pub use runtime_value::Value;
pub use string::{SchemeString, StringFlags};

#[cfg(test)]
mod tests;
