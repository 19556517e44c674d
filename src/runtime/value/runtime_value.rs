//! Runtime value representation
//!
//! `Value` is the unified, word-sized representation of every runtime value.
//! Immediates (booleans, characters, small integers and the singleton
//! markers) are stored inline and copied freely. Everything else lives in the
//! [`Heap`](super::Heap) arena and is reached through a [`Handle`].
//!
//! A `Value` never owns the heap object it refers to: the heap decides its
//! lifetime. Equality on `Value` is identity (`eq?`), so two handles compare
//! equal only if they name the same heap object. Structural comparison is
//! [`Heap::equal`](super::Heap::equal).

use std::fmt;

use super::heap::Handle;

/// Runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// `#t` / `#f`
    Boolean(bool),

    /// The empty list `()`
    #[default]
    Nil,

    /// End-of-file marker
    Eof,

    /// Result of expressions with no useful value
    Undefined,

    /// Marker for unbound variables
    Unbound,

    /// Character (Unicode scalar value)
    Char(char),

    /// Small integer, stored directly
    Int(i64),

    /// Reference to a heap-allocated object
    Heap(Handle),
}

impl Value {
    /// `#t`
    pub const TRUE: Value = Value::Boolean(true);

    /// `#f`
    pub const FALSE: Value = Value::Boolean(false);

    /// Check if this value is stored inline (needs no heap lookup)
    #[inline]
    pub fn is_immediate(&self) -> bool {
        !matches!(self, Value::Heap(_))
    }

    /// Get the heap handle, if this is a heap reference
    #[inline]
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Heap(h) => Some(*h),
            _ => None,
        }
    }

    /// Convert to i64 (small integers only)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to char
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Convert to bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Check for the empty list
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check for `#f`, the only false value
    #[inline]
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Heap(h)
    }
}

/// Shallow rendering for diagnostics. Heap objects show only their handle;
/// use the writer to print their contents.
impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Nil => write!(f, "()"),
            Value::Eof => write!(f, "#<eof>"),
            Value::Undefined => write!(f, "#<undef>"),
            Value::Unbound => write!(f, "#<unbound>"),
            Value::Char(c) => write!(f, "#\\{}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::Heap(h) => write!(f, "#<{}>", h),
        }
    }
}
