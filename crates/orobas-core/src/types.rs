//! Core type definitions for decompression operations.

/// Supported stream formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Raw DEFLATE bitstream (RFC 1951).
    Deflate,
    /// DEFLATE with Zlib framing (RFC 1950).
    Zlib,
    /// DEFLATE with Gzip framing (RFC 1952).
    Gzip,
}

impl Algorithm {
    /// Get format name as string.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Deflate => "deflate",
            Algorithm::Zlib => "zlib",
            Algorithm::Gzip => "gzip",
        }
    }
}

/// Validation profile for the decoder.
///
/// [`Profile::Strict`] cross-checks what the bitstream lets it check:
/// stored-block length complements and back-references that reach before
/// the start of the output. [`Profile::Permissive`] drops those checks for
/// callers whose input is baked into firmware and has been validated
/// elsewhere; decoding bad input may then produce garbage output or an
/// input-side error, but never reads out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Validate the stream while decoding (default).
    #[default]
    Strict,
    /// Trust the stream; skip redundant integrity checks.
    Permissive,
}

impl Profile {
    /// Check if integrity checks are enabled.
    pub fn is_strict(self) -> bool {
        matches!(self, Profile::Strict)
    }
}

/// Statistics from a decompression operation.
#[derive(Debug, Clone, Default)]
pub struct DecompressionStats {
    /// Stream format that was decoded.
    pub algorithm: Option<Algorithm>,

    /// Compressed bytes consumed, including container framing.
    pub compressed_size: usize,

    /// Decompressed bytes produced.
    pub output_size: usize,

    /// Number of DEFLATE blocks processed.
    pub blocks_processed: usize,
}

impl DecompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expansion ratio (output / input). Higher means denser input.
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.output_size as f64 / self.compressed_size as f64
    }
}
