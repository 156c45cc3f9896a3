//! Output sinks: where encoded bytes go.
//!
//! Every encoder funnels its output through a single [`Sink::write`] call
//! site, so the same code targets a file, a socket or an in-memory buffer.
//!
//! # Contract
//!
//! - The encoder never calls `write` with an empty slice.
//! - A sink returns how many bytes it accepted. Accepting fewer than offered
//!   aborts the encode with [`WriteError::ShortWrite`]; the encoder does not
//!   retry.
//! - After any error the sink may hold a truncated, invalid file.

use alloc::vec::Vec;

use crate::error::WriteError;

/// Receives encoded bytes.
///
/// This trait is object-safe; encoders take `&mut dyn Sink`.
pub trait Sink {
    /// Accept `bytes`, returning how many were consumed.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, WriteError>;
}

/// The in-memory adapter: appends to a growable byte buffer.
impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, WriteError> {
        self.try_reserve(bytes.len())
            .map_err(|_| WriteError::AllocationFailed(bytes.len()))?;
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, WriteError> {
        (**self).write(bytes)
    }
}

/// Adapts a closure into a [`Sink`].
///
/// The closure owns whatever context it captures and returns the number of
/// bytes it accepted.
///
/// ```
/// use zenwrite::{FnSink, Sink};
///
/// let mut total = 0usize;
/// let mut sink = FnSink(|bytes: &[u8]| {
///     total += bytes.len();
///     bytes.len()
/// });
/// sink.write(b"abc").unwrap();
/// drop(sink);
/// assert_eq!(total, 3);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(&[u8]) -> usize> Sink for FnSink<F> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, WriteError> {
        Ok((self.0)(bytes))
    }
}

/// Writes into any [`std::io::Write`].
///
/// Uses `write_all`, so a partial OS write is retried by the writer rather
/// than reported as a short write.
#[cfg(feature = "std")]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Sink for IoSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, WriteError> {
        use alloc::string::ToString;
        self.0
            .write_all(bytes)
            .map_err(|e| WriteError::Sink(e.to_string()))?;
        Ok(bytes.len())
    }
}

/// Per-call writer context wrapping the caller's sink.
///
/// Lives for exactly one encode call. Tracks the total byte count so
/// encoders can log it.
pub(crate) struct Writer<'s> {
    sink: &'s mut dyn Sink,
    written: u64,
}

impl<'s> Writer<'s> {
    pub(crate) fn new(sink: &'s mut dyn Sink) -> Self {
        Self { sink, written: 0 }
    }

    pub(crate) fn written(&self) -> u64 {
        self.written
    }

    pub(crate) fn put(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let accepted = self.sink.write(bytes)?;
        if accepted < bytes.len() {
            return Err(WriteError::ShortWrite {
                requested: bytes.len(),
                accepted,
            });
        }
        self.written += bytes.len() as u64;
        Ok(())
    }
}
