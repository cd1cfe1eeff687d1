//! Error types for decompression operations.

use thiserror::Error;

/// Result type alias for decompression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Decompression error types.
///
/// Every failure of the decode pipeline travels through this enum; nothing
/// panics or unwinds. Callers that speak the legacy integer protocol can
/// recover it through [`Error::result_code`].
#[derive(Debug, Error)]
pub enum Error {
    /// The compressed stream is malformed.
    #[error("corrupted stream: {message}")]
    Corrupted { message: String },

    /// The byte source ran dry (or signalled failure) mid-stream.
    #[error("unexpected end of input after {bytes_read} bytes")]
    UnexpectedEof { bytes_read: usize },

    /// The byte sink refused a decoded byte.
    #[error("output sink rejected byte at offset {offset}")]
    OutputRejected { offset: usize },

    /// A bounded output target filled up before the stream ended.
    #[error("output target full after {written} bytes")]
    TargetOverflow { written: usize },

    /// A caller-provided buffer cannot hold the result.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// The caller's window callback refused a back-reference copy.
    #[error("window callback rejected copy of {length} bytes at distance {distance}")]
    WindowRejected { length: u32, distance: u32 },

    /// Container checksum verification failed.
    #[error("checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Unsupported container feature or compression method.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create a corrupted stream error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::Corrupted {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(bytes_read: usize) -> Self {
        Error::UnexpectedEof { bytes_read }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, actual: u32) -> Self {
        Error::ChecksumMismatch { expected, actual }
    }

    /// Legacy integer result code, for callers that interoperate with the
    /// original callback protocol.
    ///
    /// Success is code 0 and has no `Error` value; the non-zero codes are:
    /// 1 for input-side failures (truncation, corruption, bad container
    /// data), 2 for output-side failures (rejected byte, exhausted target,
    /// undersized buffer), 3 for window-callback failures.
    pub fn result_code(&self) -> u8 {
        match self {
            Error::Corrupted { .. }
            | Error::UnexpectedEof { .. }
            | Error::ChecksumMismatch { .. }
            | Error::Unsupported(_) => 1,
            Error::OutputRejected { .. }
            | Error::TargetOverflow { .. }
            | Error::BufferTooSmall { .. } => 2,
            Error::WindowRejected { .. } => 3,
        }
    }
}
