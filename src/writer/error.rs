//! Writer errors

use thiserror::Error;

use crate::runtime::value::{Handle, HeapError};

/// Writer result
pub type WriteResult<T> = Result<T, WriteError>;

/// Writer errors
///
/// Usage errors carry the offending format string so the caller can report
/// it verbatim.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("output port required, but got a closed port")]
    PortClosed,

    #[error("too few arguments for format string: {fmt:?}")]
    TooFewArguments { fmt: String },

    #[error("too many arguments for format string: {fmt:?}")]
    TooManyArguments { fmt: String },

    #[error("'~*' format directive refers outside of argument list in {fmt:?}")]
    ArgumentOutOfRange { fmt: String },

    #[error("illegal format string: {fmt:?}")]
    IllegalFormat { fmt: String },

    #[error("too many {flag}-flag for formatting directive: {fmt:?}")]
    DuplicateFlag { flag: char, fmt: String },

    #[error("argument for 'v' format parameter in {fmt:?} should be either an integer, a character or #f, but got {arg}")]
    BadParameter { fmt: String, arg: String },

    #[error("incomplete %-directive in format string: {fmt:?}")]
    IncompleteDirective { fmt: String },

    #[error("argument of wrong type for %{directive} in format string: {fmt:?}")]
    ArgumentType { directive: char, fmt: String },

    /// A handle that names no live object. The heap is corrupted; callers
    /// should treat this as fatal.
    #[error("write: got a bogus object: {0}")]
    InvalidHandle(Handle),

    #[error(transparent)]
    Heap(#[from] HeapError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
