//! Class (type descriptor) registry
//!
//! Every value has a class. A class may carry a printer, used by the writer
//! instead of the generic `write-object` fallback, and a compare function,
//! used by [`Heap::equal`](super::Heap::equal) for opaque objects.
//!
//! Class ids are indices into an insertion-ordered registry, so the built-in
//! classes always occupy the same slots.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::heap::Heap;
use super::runtime_value::Value;
use crate::writer::{emit, Port, WriteContext, WriteResult};

/// Per-class printer callback.
///
/// A printer writes `value` to `port`. To print substructure it calls back
/// into the public writer API (`writer::write`, `writer::printf`, ...) on the
/// same port, which keeps shared-structure detection working for types the
/// core knows nothing about.
pub type Printer = Arc<dyn Fn(&Heap, Value, &Port, &WriteContext) -> WriteResult<()> + Send + Sync>;

/// Per-class comparison callback
pub type CompareFn = Arc<dyn Fn(&Heap, Value, Value) -> Option<Ordering> + Send + Sync>;

/// Class identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

impl ClassId {
    pub const PAIR: ClassId = ClassId(0);
    pub const VECTOR: ClassId = ClassId(1);
    pub const STRING: ClassId = ClassId(2);
    pub const SYMBOL: ClassId = ClassId(3);
    pub const INTEGER: ClassId = ClassId(4);
    pub const REAL: ClassId = ClassId(5);
    pub const RATIONAL: ClassId = ClassId(6);
    pub const COMPLEX: ClassId = ClassId(7);
    pub const BOOLEAN: ClassId = ClassId(8);
    pub const NULL: ClassId = ClassId(9);
    pub const CHAR: ClassId = ClassId(10);
    pub const EOF: ClassId = ClassId(11);
    pub const UNDEFINED: ClassId = ClassId(12);

    /// Get the registry index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Names of the built-in classes, in `ClassId` order
const BUILTIN_CLASSES: [&str; 13] = [
    "<pair>",
    "<vector>",
    "<string>",
    "<symbol>",
    "<integer>",
    "<real>",
    "<rational>",
    "<complex>",
    "<boolean>",
    "<null>",
    "<char>",
    "<eof-object>",
    "<undefined-object>",
];

/// Type descriptor
#[derive(Clone)]
pub struct Class {
    name: Arc<str>,
    printer: Option<Printer>,
    compare: Option<CompareFn>,
    write_object: Option<Printer>,
}

impl Class {
    fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            printer: None,
            compare: None,
            write_object: None,
        }
    }

    /// Class name, e.g. `<point>`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class name without the surrounding angle brackets
    pub fn bare_name(&self) -> &str {
        self.name
            .strip_prefix('<')
            .and_then(|n| n.strip_suffix('>'))
            .unwrap_or(&self.name)
    }

    /// Registered printer
    pub fn printer(&self) -> Option<&Printer> {
        self.printer.as_ref()
    }

    /// Registered compare function
    pub fn compare(&self) -> Option<&CompareFn> {
        self.compare.as_ref()
    }

    /// `write-object` specialization for this class
    pub fn write_object(&self) -> Option<&Printer> {
        self.write_object.as_ref()
    }
}

impl fmt::Debug for Class {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("printer", &self.printer.is_some())
            .field("compare", &self.compare.is_some())
            .field("write_object", &self.write_object.is_some())
            .finish()
    }
}

/// Registry of all classes known to a heap
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: IndexMap<Arc<str>, Class>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry holding the built-in classes
    pub fn new() -> Self {
        let mut registry = Self {
            classes: IndexMap::new(),
        };
        for name in BUILTIN_CLASSES {
            registry.define(name);
        }

        let string_printer: Printer = Arc::new(emit::print_string);
        let symbol_printer: Printer = Arc::new(emit::print_symbol);
        let number_printer: Printer = Arc::new(emit::print_number);
        registry.install_printer(ClassId::STRING, string_printer);
        registry.install_printer(ClassId::SYMBOL, symbol_printer);
        for id in [
            ClassId::INTEGER,
            ClassId::REAL,
            ClassId::RATIONAL,
            ClassId::COMPLEX,
        ] {
            registry.install_printer(id, number_printer.clone());
        }
        registry
    }

    /// Define a class, returning the existing id if the name is taken
    pub fn define(
        &mut self,
        name: &str,
    ) -> ClassId {
        let index = match self.classes.get_index_of(name) {
            Some(index) => index,
            None => {
                self.classes
                    .insert_full(Arc::from(name), Class::new(name))
                    .0
            }
        };
        ClassId(index as u32)
    }

    /// Look up a class by id
    pub fn get(
        &self,
        id: ClassId,
    ) -> Option<&Class> {
        self.classes.get_index(id.index()).map(|(_, class)| class)
    }

    /// Look up a class id by name
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<ClassId> {
        self.classes
            .get_index_of(name)
            .map(|index| ClassId(index as u32))
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false: built-in classes are registered on creation
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Set the printer of a class. Returns false for an unknown id.
    pub fn set_printer<F>(
        &mut self,
        id: ClassId,
        printer: F,
    ) -> bool
    where
        F: Fn(&Heap, Value, &Port, &WriteContext) -> WriteResult<()> + Send + Sync + 'static,
    {
        self.install_printer(id, Arc::new(printer))
    }

    /// Set the compare function of a class. Returns false for an unknown id.
    pub fn set_compare<F>(
        &mut self,
        id: ClassId,
        compare: F,
    ) -> bool
    where
        F: Fn(&Heap, Value, Value) -> Option<Ordering> + Send + Sync + 'static,
    {
        match self.get_mut(id) {
            Some(class) => {
                class.compare = Some(Arc::new(compare));
                true
            }
            None => false,
        }
    }

    /// Specialize the generic `write-object` fallback for a class.
    /// Returns false for an unknown id.
    pub fn define_write_object<F>(
        &mut self,
        id: ClassId,
        method: F,
    ) -> bool
    where
        F: Fn(&Heap, Value, &Port, &WriteContext) -> WriteResult<()> + Send + Sync + 'static,
    {
        match self.get_mut(id) {
            Some(class) => {
                class.write_object = Some(Arc::new(method));
                true
            }
            None => false,
        }
    }

    fn install_printer(
        &mut self,
        id: ClassId,
        printer: Printer,
    ) -> bool {
        match self.get_mut(id) {
            Some(class) => {
                class.printer = Some(printer);
                true
            }
            None => false,
        }
    }

    fn get_mut(
        &mut self,
        id: ClassId,
    ) -> Option<&mut Class> {
        self.classes
            .get_index_mut(id.index())
            .map(|(_, class)| class)
    }
}
