//! Core traits for decompression.
//!
//! The decoder is parameterized by independent capability traits rather than
//! one combined stream type: a [`ByteSource`] feeding the bit reader, a
//! [`ByteSink`] consuming decoded bytes, and an optional [`CopyWindow`] for
//! callers that keep the back-reference history themselves. The slots stay
//! separate because several supported configurations omit the window
//! capability entirely, and the bounded-target mode fuses output and window
//! into one buffer.
//!
//! [`FnSource`], [`FnSink`], and [`FnWindow`] adapt plain closures into the
//! three capability slots. [`Decompressor`] is the one-shot convenience
//! layer on top.

use crate::error::{Error, Result};
use crate::types::{Algorithm, DecompressionStats};

/// Supplies compressed bytes to the decoder, one at a time.
///
/// Returning `None` signals end of input (or an input-side failure); the
/// decoder will not call the source again afterwards.
pub trait ByteSource {
    /// Fetch the next input byte.
    fn next_byte(&mut self) -> Option<u8>;
}

/// A [`ByteSource`] over an in-memory slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source reading from the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes handed out so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

/// Adapter turning a `FnMut() -> Option<u8>` callback into a [`ByteSource`].
pub struct FnSource<F>(F);

impl<F: FnMut() -> Option<u8>> FnSource<F> {
    /// Wrap a callback.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F: FnMut() -> Option<u8>> ByteSource for FnSource<F> {
    fn next_byte(&mut self) -> Option<u8> {
        (self.0)()
    }
}

/// Consumes decoded bytes, one at a time.
///
/// Returning `false` refuses the byte and aborts the decode with an
/// output-side error; bytes already accepted stay accepted.
pub trait ByteSink {
    /// Consume one decoded byte.
    fn accept(&mut self, byte: u8) -> bool;
}

impl ByteSink for Vec<u8> {
    fn accept(&mut self, byte: u8) -> bool {
        self.push(byte);
        true
    }
}

/// Adapter turning a `FnMut(u8) -> bool` callback into a [`ByteSink`].
pub struct FnSink<F>(F);

impl<F: FnMut(u8) -> bool> FnSink<F> {
    /// Wrap a callback; it returns `false` to refuse a byte.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F: FnMut(u8) -> bool> ByteSink for FnSink<F> {
    fn accept(&mut self, byte: u8) -> bool {
        (self.0)(byte)
    }
}

/// Performs back-reference copies for callers that own the output history.
///
/// When this capability is supplied, the decoder forwards literals through
/// the [`ByteSink`] and delegates every back-reference to [`CopyWindow::copy`]
/// instead of keeping a window of its own. Before the first real copy the
/// decoder calls `copy(0, 32768)` once: length zero, distance equal to the
/// maximum look-behind the stream may use, as an allocation hint.
///
/// Returning `false` aborts the decode with a window-side error.
pub trait CopyWindow {
    /// Copy `length` bytes starting `distance` bytes back in the output.
    fn copy(&mut self, length: u32, distance: u32) -> bool;
}

/// Adapter turning a `FnMut(u32, u32) -> bool` callback into a
/// [`CopyWindow`].
pub struct FnWindow<F>(F);

impl<F: FnMut(u32, u32) -> bool> FnWindow<F> {
    /// Wrap a callback; it receives `(length, distance)` pairs.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F: FnMut(u32, u32) -> bool> CopyWindow for FnWindow<F> {
    fn copy(&mut self, length: u32, distance: u32) -> bool {
        (self.0)(length, distance)
    }
}

/// One-shot decompression operations.
pub trait Decompressor {
    /// Get the stream format this decompressor handles.
    fn algorithm(&self) -> Algorithm;

    /// Decompress data in one shot.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress data into an existing buffer.
    ///
    /// # Returns
    /// Number of bytes written to output.
    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Decompress with known output size.
    fn decompress_with_size(&self, input: &[u8], output_size: usize) -> Result<Vec<u8>> {
        let mut output = vec![0u8; output_size];
        let written = self.decompress_to(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Get decompression statistics after an operation.
    fn stats(&self) -> Option<DecompressionStats> {
        None
    }
}

/// Helper for `decompress_to` implementations that materialize a vector.
pub fn copy_into(decompressed: Vec<u8>, output: &mut [u8]) -> Result<usize> {
    if decompressed.len() > output.len() {
        return Err(Error::buffer_too_small(decompressed.len(), output.len()));
    }
    output[..decompressed.len()].copy_from_slice(&decompressed);
    Ok(decompressed.len())
}
