//! Heap storage with handle-based allocation
//!
//! Aggregates live in an arena keyed by [`Handle`]. Handles are stable for the
//! lifetime of an object and double as object identity: the writer's shared
//! structure detection compares handles, never contents.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use thiserror::Error;

use super::class::{ClassId, ClassRegistry};
use super::number::Number;
use super::runtime_value::Value;
use super::string::SchemeString;

/// Handle to an object stored in the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub usize);

impl Handle {
    /// Create a new handle from a raw value
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    /// Get the raw handle value
    pub fn raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "handle@{}", self.0)
    }
}

/// Heap errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("invalid handle: {0}")]
    InvalidHandle(Handle),

    #[error("pair required, but got {0}")]
    NotAPair(Value),

    #[error("vector required, but got {0}")]
    NotAVector(Value),

    #[error("index {index} out of range for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unknown class id {0}")]
    UnknownClass(u32),
}

/// Instance of a class the core knows nothing about
pub struct OpaqueObject {
    /// Class of the instance
    pub class: ClassId,
    /// Instance data, interpreted only by the class's own callbacks
    pub payload: Box<dyn Any + Send + Sync>,
}

impl fmt::Debug for OpaqueObject {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("OpaqueObject")
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

/// Heap object
#[derive(Debug)]
pub enum HeapObject {
    /// Cons cell
    Pair { car: Value, cdr: Value },
    /// Vector
    Vector(Vec<Value>),
    /// String
    String(SchemeString),
    /// Interned symbol
    Symbol(Arc<str>),
    /// Non-immediate number
    Number(Number),
    /// User-defined type
    Opaque(OpaqueObject),
}

impl HeapObject {
    /// Class of this object
    pub fn class_id(&self) -> ClassId {
        match self {
            HeapObject::Pair { .. } => ClassId::PAIR,
            HeapObject::Vector(_) => ClassId::VECTOR,
            HeapObject::String(_) => ClassId::STRING,
            HeapObject::Symbol(_) => ClassId::SYMBOL,
            HeapObject::Number(Number::Integer(_)) => ClassId::INTEGER,
            HeapObject::Number(Number::Flonum(_)) => ClassId::REAL,
            HeapObject::Number(Number::Ratnum(..)) => ClassId::RATIONAL,
            HeapObject::Number(Number::Compnum(..)) => ClassId::COMPLEX,
            HeapObject::Opaque(o) => o.class,
        }
    }

    /// Check whether this object can take part in shared-structure
    /// detection: pairs, non-empty strings and vectors, and opaque objects.
    pub fn is_trackable(&self) -> bool {
        match self {
            HeapObject::Pair { .. } | HeapObject::Opaque(_) => true,
            HeapObject::Vector(items) => !items.is_empty(),
            HeapObject::String(s) => !s.is_empty(),
            HeapObject::Symbol(_) | HeapObject::Number(_) => false,
        }
    }
}

/// Heap storage for runtime objects
///
/// The heap provides allocation and access through handles, the symbol
/// table, and the class registry.
#[derive(Debug)]
pub struct Heap {
    /// Handle generator for allocation
    next_handle: usize,
    /// Handle to object mapping
    objects: HashMap<Handle, HeapObject>,
    /// Free list for handle reuse
    free_list: Vec<Handle>,
    /// Interned symbols
    symbols: HashMap<Arc<str>, Handle>,
    /// Type descriptors
    classes: ClassRegistry,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Create a new empty heap with the built-in classes registered
    pub fn new() -> Self {
        Self {
            next_handle: 0usize,
            objects: HashMap::new(),
            free_list: Vec::new(),
            symbols: HashMap::new(),
            classes: ClassRegistry::new(),
        }
    }

    /// Allocate a heap object and return its handle
    pub fn allocate(
        &mut self,
        object: HeapObject,
    ) -> Handle {
        let handle = if let Some(h) = self.free_list.pop() {
            h
        } else {
            let h = Handle(self.next_handle);
            self.next_handle = self.next_handle.wrapping_add(1);
            h
        };
        self.objects.insert(handle, object);
        handle
    }

    /// Get an immutable reference to a heap object by handle
    pub fn get(
        &self,
        handle: Handle,
    ) -> Option<&HeapObject> {
        self.objects.get(&handle)
    }

    /// Get a mutable reference to a heap object by handle
    pub fn get_mut(
        &mut self,
        handle: Handle,
    ) -> Option<&mut HeapObject> {
        self.objects.get_mut(&handle)
    }

    /// Resolve a value to its heap object, if it is a live heap reference
    pub fn object(
        &self,
        value: Value,
    ) -> Option<&HeapObject> {
        value.as_handle().and_then(|h| self.get(h))
    }

    /// Release an object. Interned symbols stay reachable through the
    /// symbol table and are never freed.
    pub fn deallocate(
        &mut self,
        handle: Handle,
    ) -> Option<HeapObject> {
        if matches!(self.objects.get(&handle), Some(HeapObject::Symbol(_))) {
            return None;
        }
        let object = self.objects.remove(&handle)?;
        self.free_list.push(handle);
        Some(object)
    }

    /// Check if a handle is valid
    pub fn is_valid(
        &self,
        handle: Handle,
    ) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Get the number of allocated objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    /// Class registry
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable class registry, for registering printers and methods
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// Define a user class
    pub fn define_class(
        &mut self,
        name: &str,
    ) -> ClassId {
        self.classes.define(name)
    }

    /// Class of any value
    pub fn class_of(
        &self,
        value: Value,
    ) -> ClassId {
        match value {
            Value::Boolean(_) => ClassId::BOOLEAN,
            Value::Nil => ClassId::NULL,
            Value::Eof => ClassId::EOF,
            Value::Undefined | Value::Unbound => ClassId::UNDEFINED,
            Value::Char(_) => ClassId::CHAR,
            Value::Int(_) => ClassId::INTEGER,
            Value::Heap(h) => self
                .get(h)
                .map(HeapObject::class_id)
                .unwrap_or(ClassId::UNDEFINED),
        }
    }

    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    /// Allocate a pair
    pub fn cons(
        &mut self,
        car: Value,
        cdr: Value,
    ) -> Value {
        Value::Heap(self.allocate(HeapObject::Pair { car, cdr }))
    }

    /// Build a proper list
    pub fn list<I>(
        &mut self,
        items: I,
    ) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        self.dotted_list(items, Value::Nil)
    }

    /// Build a list ending in `tail`
    pub fn dotted_list<I>(
        &mut self,
        items: I,
        tail: Value,
    ) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        let items: Vec<Value> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| self.cons(item, acc))
    }

    /// Allocate a vector
    pub fn vector<I>(
        &mut self,
        items: I,
    ) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Heap(self.allocate(HeapObject::Vector(items.into_iter().collect())))
    }

    /// Allocate a mutable string
    pub fn string(
        &mut self,
        s: &str,
    ) -> Value {
        Value::Heap(self.allocate(HeapObject::String(SchemeString::new(s))))
    }

    /// Allocate an immutable (literal) string
    pub fn immutable_string(
        &mut self,
        s: &str,
    ) -> Value {
        Value::Heap(self.allocate(HeapObject::String(SchemeString::immutable(s))))
    }

    /// Allocate a string from raw bytes, flagged incomplete unless valid UTF-8
    pub fn byte_string(
        &mut self,
        bytes: &[u8],
    ) -> Value {
        Value::Heap(self.allocate(HeapObject::String(SchemeString::from_bytes(bytes))))
    }

    /// Intern a symbol. The same name always yields the same handle.
    pub fn intern(
        &mut self,
        name: &str,
    ) -> Value {
        if let Some(h) = self.symbols.get(name) {
            return Value::Heap(*h);
        }
        let name: Arc<str> = Arc::from(name);
        let handle = self.allocate(HeapObject::Symbol(name.clone()));
        self.symbols.insert(name, handle);
        Value::Heap(handle)
    }

    /// Allocate a number
    pub fn number(
        &mut self,
        number: Number,
    ) -> Value {
        Value::Heap(self.allocate(HeapObject::Number(number)))
    }

    /// Make an integer, using an immediate when it fits
    pub fn integer(
        &mut self,
        n: impl Into<BigInt>,
    ) -> Value {
        let n: BigInt = n.into();
        match i64::try_from(&n) {
            Ok(small) => Value::Int(small),
            Err(_) => self.number(Number::Integer(n)),
        }
    }

    /// Allocate a flonum
    pub fn flonum(
        &mut self,
        f: f64,
    ) -> Value {
        self.number(Number::Flonum(f))
    }

    /// Allocate an instance of a user class
    pub fn make_opaque<T>(
        &mut self,
        class: ClassId,
        payload: T,
    ) -> Result<Value, HeapError>
    where
        T: Any + Send + Sync,
    {
        if self.classes.get(class).is_none() {
            return Err(HeapError::UnknownClass(class.0));
        }
        let object = OpaqueObject {
            class,
            payload: Box::new(payload),
        };
        Ok(Value::Heap(self.allocate(HeapObject::Opaque(object))))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Check for a pair
    pub fn is_pair(
        &self,
        value: Value,
    ) -> bool {
        matches!(self.object(value), Some(HeapObject::Pair { .. }))
    }

    /// Car of a pair
    pub fn car(
        &self,
        pair: Value,
    ) -> Option<Value> {
        match self.object(pair) {
            Some(HeapObject::Pair { car, .. }) => Some(*car),
            _ => None,
        }
    }

    /// Cdr of a pair
    pub fn cdr(
        &self,
        pair: Value,
    ) -> Option<Value> {
        match self.object(pair) {
            Some(HeapObject::Pair { cdr, .. }) => Some(*cdr),
            _ => None,
        }
    }

    /// Name of a symbol
    pub fn symbol_name(
        &self,
        value: Value,
    ) -> Option<&str> {
        match self.object(value) {
            Some(HeapObject::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    /// String object behind a value
    pub fn as_string(
        &self,
        value: Value,
    ) -> Option<&SchemeString> {
        match self.object(value) {
            Some(HeapObject::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Number object behind a value
    pub fn as_number(
        &self,
        value: Value,
    ) -> Option<&Number> {
        match self.object(value) {
            Some(HeapObject::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Exact integer value of an integer (immediate or heap) or integral flonum
    pub fn exact_integer(
        &self,
        value: Value,
    ) -> Option<BigInt> {
        match value {
            Value::Int(i) => Some(BigInt::from(i)),
            _ => self.as_number(value).and_then(Number::to_exact_integer),
        }
    }

    /// Payload of an opaque object, if it has type `T`
    pub fn payload<T: Any>(
        &self,
        value: Value,
    ) -> Option<&T> {
        match self.object(value) {
            Some(HeapObject::Opaque(o)) => o.payload.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Collect the elements of a proper list. Returns `None` for improper or
    /// circular lists.
    pub fn list_to_vec(
        &self,
        list: Value,
    ) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        let mut slow = list;
        let mut fast = list;
        loop {
            for _ in 0..2 {
                match self.object(fast) {
                    Some(HeapObject::Pair { car, cdr }) => {
                        items.push(*car);
                        fast = *cdr;
                    }
                    _ if fast.is_nil() => return Some(items),
                    _ => return None,
                }
            }
            slow = self.cdr(slow)?;
            if slow == fast {
                return None;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Replace the car of a pair
    pub fn set_car(
        &mut self,
        pair: Value,
        value: Value,
    ) -> Result<(), HeapError> {
        match pair.as_handle().and_then(|h| self.objects.get_mut(&h)) {
            Some(HeapObject::Pair { car, .. }) => {
                *car = value;
                Ok(())
            }
            _ => Err(HeapError::NotAPair(pair)),
        }
    }

    /// Replace the cdr of a pair
    pub fn set_cdr(
        &mut self,
        pair: Value,
        value: Value,
    ) -> Result<(), HeapError> {
        match pair.as_handle().and_then(|h| self.objects.get_mut(&h)) {
            Some(HeapObject::Pair { cdr, .. }) => {
                *cdr = value;
                Ok(())
            }
            _ => Err(HeapError::NotAPair(pair)),
        }
    }

    /// Replace a vector element
    pub fn vector_set(
        &mut self,
        vector: Value,
        index: usize,
        value: Value,
    ) -> Result<(), HeapError> {
        match vector.as_handle().and_then(|h| self.objects.get_mut(&h)) {
            Some(HeapObject::Vector(items)) => {
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or(HeapError::IndexOutOfBounds { index, len })?;
                *slot = value;
                Ok(())
            }
            _ => Err(HeapError::NotAVector(vector)),
        }
    }
}
