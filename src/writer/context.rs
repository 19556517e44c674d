//! Per-call write context

use serde::{Deserialize, Serialize};

/// Output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Machine-readable form (`write`)
    #[default]
    Write,
    /// Human-readable form (`display`): no quotes, raw characters
    Display,
    /// Like `Write`, for debugging output
    Debug,
}

impl WriteMode {
    /// Check whether output should be readable back
    #[inline]
    pub fn is_readable(&self) -> bool {
        !matches!(self, WriteMode::Display)
    }
}

/// Extra write flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteFlags(u8);

impl WriteFlags {
    /// No flags
    pub const NONE: WriteFlags = WriteFlags(0);
    /// Output length is limited by `WriteContext::limit`
    pub const LIMITED: WriteFlags = WriteFlags(0x10);
    /// Circular-safe write, labels shared structure
    pub const CIRCULAR: WriteFlags = WriteFlags(0x20);

    /// Check if all bits of `other` are set
    #[inline]
    pub fn contains(
        &self,
        other: WriteFlags,
    ) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag sets
    #[inline]
    pub fn with(
        self,
        other: WriteFlags,
    ) -> WriteFlags {
        WriteFlags(self.0 | other.0)
    }
}

/// Write context, created fresh for every top-level write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteContext {
    /// Output mode
    pub mode: WriteMode,
    /// Extra flags
    pub flags: WriteFlags,
    /// Character limit; meaningful only with `WriteFlags::LIMITED`
    pub limit: usize,
}

impl WriteContext {
    /// Plain context for the given mode
    pub fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            flags: WriteFlags::NONE,
            limit: 0,
        }
    }

    /// Context that stops producing output after `limit` characters
    pub fn limited(
        mode: WriteMode,
        limit: usize,
    ) -> Self {
        Self {
            mode,
            flags: WriteFlags::LIMITED,
            limit,
        }
    }

    /// Add flags
    pub fn with_flags(
        mut self,
        flags: WriteFlags,
    ) -> Self {
        self.flags = self.flags.with(flags);
        self
    }

    /// Check the `LIMITED` flag
    #[inline]
    pub fn is_limited(&self) -> bool {
        self.flags.contains(WriteFlags::LIMITED)
    }

    /// Check the `CIRCULAR` flag
    #[inline]
    pub fn is_circular(&self) -> bool {
        self.flags.contains(WriteFlags::CIRCULAR)
    }
}
