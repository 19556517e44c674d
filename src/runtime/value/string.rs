//! Heap string storage

/// String flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringFlags {
    /// The byte content is not valid UTF-8
    pub incomplete: bool,
    /// The string is a literal and must not be mutated
    pub immutable: bool,
}

/// A runtime string: raw bytes plus a cached character count.
///
/// Complete strings are valid UTF-8. Incomplete strings carry arbitrary
/// bytes; their character length equals their byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeString {
    bytes: Vec<u8>,
    char_length: usize,
    flags: StringFlags,
}

impl SchemeString {
    /// Create a mutable, complete string
    pub fn new(s: &str) -> Self {
        Self {
            bytes: s.as_bytes().to_vec(),
            char_length: s.chars().count(),
            flags: StringFlags::default(),
        }
    }

    /// Create an immutable (literal) string
    pub fn immutable(s: &str) -> Self {
        let mut string = Self::new(s);
        string.flags.immutable = true;
        string
    }

    /// Create a string from raw bytes.
    ///
    /// Bytes that form valid UTF-8 produce a complete string; anything else
    /// is flagged incomplete.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(s) => Self::new(s),
            Err(_) => Self {
                bytes: bytes.to_vec(),
                char_length: bytes.len(),
                flags: StringFlags {
                    incomplete: true,
                    immutable: false,
                },
            },
        }
    }

    /// Number of characters
    #[inline]
    pub fn len(&self) -> usize {
        self.char_length
    }

    /// Number of bytes
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Check for a zero-size string
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Flags of this string
    #[inline]
    pub fn flags(&self) -> StringFlags {
        self.flags
    }

    /// Raw bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Text content; `None` for incomplete strings
    pub fn as_str(&self) -> Option<&str> {
        if self.flags.incomplete {
            None
        } else {
            std::str::from_utf8(&self.bytes).ok()
        }
    }
}
