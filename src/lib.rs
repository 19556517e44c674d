//! scheme-writer
//!
//! Value model and writer core of a Scheme-family runtime: tagged values on
//! a handle-based heap, a class registry with per-class printers, and a
//! writer that prints any value graph, including cyclic ones, as text.
//!
//! # Example
//!
//! ```
//! use scheme_writer::runtime::value::{Heap, Value};
//! use scheme_writer::writer::{write_to_string, WriteMode};
//!
//! let mut heap = Heap::new();
//! let quote = heap.intern("quote");
//! let x = heap.intern("x");
//! let form = heap.list([quote, x]);
//! let list = heap.list([Value::Int(1), form, Value::Char(' ')]);
//!
//! let text = write_to_string(&heap, list, WriteMode::Write, false).unwrap();
//! assert_eq!(text, "(1 'x #\\space)");
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod runtime;
pub mod writer;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

pub use runtime::value::{Heap, Value};
pub use writer::{
    format, printf, printf_shared, write, write_circular, write_limited, write_shared,
    write_to_string, Port, PrintfArg, WriteError, WriteMode, WriteResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "scheme-writer";
