//! Codec wrappers for DEFLATE, Gzip, and Zlib decompression.

use orobas_core::{copy_into, Algorithm, Decompressor, Result};

use crate::gzip::gzip_decompress_with;
use crate::inflate::{inflate_with, InflateConfig};
use crate::zlib::zlib_decompress_with;

// ============================================================================
// Deflate
// ============================================================================

/// Raw DEFLATE decompressor.
#[derive(Debug, Clone, Default)]
pub struct DeflateDecompressor {
    config: InflateConfig,
}

impl DeflateDecompressor {
    /// Create a new DEFLATE decompressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit configuration.
    pub fn with_config(config: InflateConfig) -> Self {
        Self { config }
    }
}

impl Decompressor for DeflateDecompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Deflate
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        inflate_with(input, &mut output, &self.config)?;
        Ok(output)
    }

    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        copy_into(self.decompress(input)?, output)
    }
}

// ============================================================================
// Gzip
// ============================================================================

/// Gzip decompressor.
#[derive(Debug, Clone, Default)]
pub struct GzipDecompressor {
    config: InflateConfig,
}

impl GzipDecompressor {
    /// Create a new gzip decompressor. The trailer is skipped, not checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit configuration.
    pub fn with_config(config: InflateConfig) -> Self {
        Self { config }
    }

    /// Create a decompressor that verifies the CRC-32 and ISIZE trailer.
    pub fn verifying() -> Self {
        Self {
            config: InflateConfig {
                verify_checksum: true,
                ..Default::default()
            },
        }
    }
}

impl Decompressor for GzipDecompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Gzip
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        gzip_decompress_with(input, &self.config)
    }

    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        copy_into(self.decompress(input)?, output)
    }
}

// ============================================================================
// Zlib
// ============================================================================

/// Zlib decompressor.
#[derive(Debug, Clone, Default)]
pub struct ZlibDecompressor {
    config: InflateConfig,
}

impl ZlibDecompressor {
    /// Create a new zlib decompressor. The trailer is skipped, not checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit configuration.
    pub fn with_config(config: InflateConfig) -> Self {
        Self { config }
    }

    /// Create a decompressor that verifies the Adler-32 trailer.
    pub fn verifying() -> Self {
        Self {
            config: InflateConfig {
                verify_checksum: true,
                ..Default::default()
            },
        }
    }
}

impl Decompressor for ZlibDecompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Zlib
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        zlib_decompress_with(input, &self.config)
    }

    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        copy_into(self.decompress(input)?, output)
    }
}

/// Pick a decompressor from sniffed input, mirroring the engine's own
/// container detection: the gzip magic selects gzip, anything else is raw
/// DEFLATE. Zlib needs an explicit choice; its header bytes are valid
/// DEFLATE starts.
pub fn sniff_algorithm(input: &[u8]) -> Algorithm {
    if input.len() >= 2 && input[0] == 0x1f && input[1] == 0x8b {
        Algorithm::Gzip
    } else {
        Algorithm::Deflate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orobas_core::Profile;

    const HELLO_DEFLATE: [u8; 7] = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];

    #[test]
    fn test_deflate_decompressor() {
        let codec = DeflateDecompressor::new();
        assert_eq!(codec.algorithm(), Algorithm::Deflate);
        assert_eq!(codec.decompress(&HELLO_DEFLATE).unwrap(), b"Hello");
    }

    #[test]
    fn test_decompress_to_and_with_size() {
        let codec = DeflateDecompressor::new();

        let mut buf = [0u8; 5];
        assert_eq!(codec.decompress_to(&HELLO_DEFLATE, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"Hello");

        let exact = codec.decompress_with_size(&HELLO_DEFLATE, 5).unwrap();
        assert_eq!(exact, b"Hello");

        let mut tiny = [0u8; 3];
        let err = codec.decompress_to(&HELLO_DEFLATE, &mut tiny).unwrap_err();
        assert_eq!(err.result_code(), 2);
    }

    #[test]
    fn test_permissive_config_passthrough() {
        let codec = DeflateDecompressor::with_config(InflateConfig {
            profile: Profile::Permissive,
            ..Default::default()
        });
        assert_eq!(codec.decompress(&HELLO_DEFLATE).unwrap(), b"Hello");
    }

    #[test]
    fn test_sniff_algorithm() {
        assert_eq!(sniff_algorithm(&[0x1f, 0x8b, 0x08]), Algorithm::Gzip);
        assert_eq!(sniff_algorithm(&HELLO_DEFLATE), Algorithm::Deflate);
        assert_eq!(sniff_algorithm(&[]), Algorithm::Deflate);
    }
}
