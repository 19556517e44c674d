//! Output ports
//!
//! A [`Port`] is a cloneable handle to a sink behind a recursive lock. The
//! lock is held for a whole logical write, so output of concurrent writers
//! never interleaves, while printers running inside a write can call back
//! into the writer on the same port without deadlocking.
//!
//! The port also carries the pass state of the write in progress. Public
//! entry points consult it so that a nested call made by a class printer
//! joins the current walk or emit pass instead of starting a new write.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::error::{WriteError, WriteResult};
use super::tracker::SharedTable;

// ============================================================================
// Sinks
// ============================================================================

/// Destination of port output
pub trait Sink: Send {
    /// Write one character
    fn put_char(
        &mut self,
        c: char,
    ) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.put_str(c.encode_utf8(&mut buf))
    }

    /// Write a string
    fn put_str(
        &mut self,
        s: &str,
    ) -> io::Result<()> {
        self.put_bytes(s.as_bytes())
    }

    /// Write raw bytes
    fn put_bytes(
        &mut self,
        bytes: &[u8],
    ) -> io::Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Characters written so far. Only in-memory sinks know this.
    fn current_length(&self) -> Option<usize> {
        None
    }

    /// Accumulated output of an in-memory sink
    fn contents(&self) -> Option<&[u8]> {
        None
    }

    /// Take the accumulated output, leaving the sink empty
    fn take(&mut self) -> Option<Vec<u8>> {
        None
    }
}

/// In-memory sink
#[derive(Debug, Default)]
pub struct StringSink {
    buf: Vec<u8>,
    chars: usize,
}

impl StringSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for StringSink {
    fn put_char(
        &mut self,
        c: char,
    ) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.buf.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        self.chars += 1;
        Ok(())
    }

    fn put_str(
        &mut self,
        s: &str,
    ) -> io::Result<()> {
        self.buf.extend_from_slice(s.as_bytes());
        self.chars += s.chars().count();
        Ok(())
    }

    fn put_bytes(
        &mut self,
        bytes: &[u8],
    ) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        self.chars += char_count(bytes);
        Ok(())
    }

    fn current_length(&self) -> Option<usize> {
        Some(self.chars)
    }

    fn contents(&self) -> Option<&[u8]> {
        Some(&self.buf)
    }

    fn take(&mut self) -> Option<Vec<u8>> {
        self.chars = 0;
        Some(std::mem::take(&mut self.buf))
    }
}

/// Number of characters in `bytes`. Continuation bytes do not start a
/// character, so bytes of an incomplete string count one each.
pub(crate) fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| (**b & 0xC0) != 0x80).count()
}

/// The leading `n` characters of `bytes`, counted as in [`char_count`]
pub(crate) fn char_prefix(
    bytes: &[u8],
    n: usize,
) -> &[u8] {
    let end = bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| (**b & 0xC0) != 0x80)
        .nth(n)
        .map_or(bytes.len(), |(i, _)| i);
    &bytes[..end]
}

/// Sink that drops everything, used by the walk pass
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl Sink for DiscardSink {
    fn put_char(
        &mut self,
        _c: char,
    ) -> io::Result<()> {
        Ok(())
    }

    fn put_str(
        &mut self,
        _s: &str,
    ) -> io::Result<()> {
        Ok(())
    }

    fn put_bytes(
        &mut self,
        _bytes: &[u8],
    ) -> io::Result<()> {
        Ok(())
    }
}

/// Sink over any `io::Write`
#[derive(Debug)]
pub struct IoSink<W: io::Write + Send> {
    inner: W,
}

impl<W: io::Write + Send> IoSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write + Send> Sink for IoSink<W> {
    fn put_bytes(
        &mut self,
        bytes: &[u8],
    ) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ============================================================================
// Pass state
// ============================================================================

/// Pass a port is currently taking part in
pub(crate) enum Pass {
    /// Plain output
    Direct,
    /// Walk pass: output is discarded, objects are recorded in the table
    Walk(SharedTable),
    /// Emit pass of a shared write: the table decides labels
    Emit(SharedTable),
}

/// Kind of the current pass, without the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassKind {
    Direct,
    Walk,
    Emit,
}

impl Pass {
    fn kind(&self) -> PassKind {
        match self {
            Pass::Direct => PassKind::Direct,
            Pass::Walk(_) => PassKind::Walk,
            Pass::Emit(_) => PassKind::Emit,
        }
    }
}

/// Restores the previous pass of a port when dropped
pub(crate) struct PassGuard<'a> {
    port: &'a Port,
    previous: Option<Pass>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let core = self.port.inner.lock();
            *core.pass.borrow_mut() = previous;
        }
    }
}

// ============================================================================
// Port
// ============================================================================

struct PortCore {
    sink: RefCell<Box<dyn Sink>>,
    pass: RefCell<Pass>,
    open: Cell<bool>,
    /// Set when a limited write skipped output
    truncated: Cell<bool>,
}

/// Lock on a port, held for the duration of a logical write
pub struct PortLock<'a> {
    _guard: ReentrantMutexGuard<'a, PortCore>,
}

/// Output port
///
/// Clones refer to the same port.
#[derive(Clone)]
pub struct Port {
    inner: Arc<ReentrantMutex<PortCore>>,
}

impl fmt::Debug for Port {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let core = self.inner.lock();
        let pass = core.pass.borrow().kind();
        let length = core.sink.borrow().current_length();
        f.debug_struct("Port")
            .field("open", &core.open.get())
            .field("pass", &pass)
            .field("length", &length)
            .finish()
    }
}

impl Port {
    /// Create a port over a sink
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::with_pass(Box::new(sink), Pass::Direct)
    }

    /// Create an in-memory string port
    pub fn string() -> Self {
        Self::new(StringSink::new())
    }

    /// Create a port writing to standard output
    pub fn stdout() -> Self {
        Self::new(IoSink::new(io::stdout()))
    }

    /// Create a walker port: output is discarded and every write on it runs
    /// the walk pass against a fresh table.
    pub fn walker() -> Self {
        Self::with_pass(Box::new(DiscardSink), Pass::Walk(SharedTable::new()))
    }

    fn with_pass(
        sink: Box<dyn Sink>,
        pass: Pass,
    ) -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(PortCore {
                sink: RefCell::new(sink),
                pass: RefCell::new(pass),
                open: Cell::new(true),
                truncated: Cell::new(false),
            })),
        }
    }

    /// Take the port lock. The lock is recursive: the owning thread may take
    /// it again, other threads block until it is released.
    pub fn lock(&self) -> PortLock<'_> {
        PortLock {
            _guard: self.inner.lock(),
        }
    }

    /// Write one character
    pub fn put_char(
        &self,
        c: char,
    ) -> WriteResult<()> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.put_char(c)?;
        Ok(())
    }

    /// Write a string
    pub fn put_str(
        &self,
        s: &str,
    ) -> WriteResult<()> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.put_str(s)?;
        Ok(())
    }

    /// Write raw bytes
    pub fn put_bytes(
        &self,
        bytes: &[u8],
    ) -> WriteResult<()> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.put_bytes(bytes)?;
        Ok(())
    }

    /// Flush the sink
    pub fn flush(&self) -> WriteResult<()> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.flush()?;
        Ok(())
    }

    /// Characters written so far, if the sink keeps count
    pub fn current_length(&self) -> Option<usize> {
        let core = self.inner.lock();
        let length = core.sink.borrow().current_length();
        length
    }

    /// Output accumulated by an in-memory port
    pub fn output_string(&self) -> Option<String> {
        let core = self.inner.lock();
        let sink = core.sink.borrow();
        sink.contents()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Take the output of an in-memory port, leaving it empty
    pub fn take_output(&self) -> Option<String> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.take()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Take the raw bytes of an in-memory port, leaving it empty
    pub fn take_bytes(&self) -> Option<Vec<u8>> {
        let core = self.inner.lock();
        let mut sink = core.sink.borrow_mut();
        sink.take()
    }

    /// Flush and close the port. Later writes fail with `PortClosed`.
    pub fn close(&self) -> WriteResult<()> {
        let core = self.inner.lock();
        if !core.open.get() {
            return Ok(());
        }
        core.open.set(false);
        let mut sink = core.sink.borrow_mut();
        sink.flush()?;
        Ok(())
    }

    /// Check whether the port accepts output
    pub fn is_open(&self) -> bool {
        self.inner.lock().open.get()
    }

    /// Fail with `PortClosed` unless the port is open
    pub fn ensure_open(&self) -> WriteResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(WriteError::PortClosed)
        }
    }

    /// Check whether two handles refer to the same port
    pub fn same_port(
        &self,
        other: &Port,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------------
    // Pass state
    // ------------------------------------------------------------------------

    pub(crate) fn pass_kind(&self) -> PassKind {
        let core = self.inner.lock();
        let kind = core.pass.borrow().kind();
        kind
    }

    /// Record that a limited write stopped before the end of its output
    pub(crate) fn mark_truncated(&self) {
        self.inner.lock().truncated.set(true);
    }

    /// Check and clear the truncation mark
    pub(crate) fn take_truncated(&self) -> bool {
        self.inner.lock().truncated.replace(false)
    }

    /// Run `f` on the table of the current walk or emit pass
    pub(crate) fn with_table<R>(
        &self,
        f: impl FnOnce(&mut SharedTable) -> R,
    ) -> Option<R> {
        let core = self.inner.lock();
        let mut pass = core.pass.borrow_mut();
        match &mut *pass {
            Pass::Walk(table) | Pass::Emit(table) => Some(f(table)),
            Pass::Direct => None,
        }
    }

    /// Remove the table from the port, leaving it in the direct pass
    pub(crate) fn take_table(&self) -> Option<SharedTable> {
        let core = self.inner.lock();
        let previous = std::mem::replace(&mut *core.pass.borrow_mut(), Pass::Direct);
        match previous {
            Pass::Walk(table) | Pass::Emit(table) => Some(table),
            Pass::Direct => None,
        }
    }

    /// Switch the port to `pass` until the guard drops
    pub(crate) fn enter_pass(
        &self,
        pass: Pass,
    ) -> PassGuard<'_> {
        let core = self.inner.lock();
        let previous = std::mem::replace(&mut *core.pass.borrow_mut(), pass);
        PassGuard {
            port: self,
            previous: Some(previous),
        }
    }
}
