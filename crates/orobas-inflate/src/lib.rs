//! # Orobas Inflate
//!
//! DEFLATE (RFC 1951), Gzip (RFC 1952), and Zlib (RFC 1950) decompression,
//! written for environments where memory is counted in kilobytes: the decode
//! core runs off fixed-size scratch, the 32 KiB window can live inside the
//! caller's own output buffer, and input/output/window are pluggable
//! capabilities rather than a stream abstraction.
//!
//! ## Quick Start
//!
//! ```
//! use orobas_inflate::decompress;
//!
//! // Auto-detects gzip framing; anything else decodes as raw DEFLATE.
//! let data = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
//! let output = decompress(&data).unwrap();
//! assert_eq!(output, b"Hello");
//! ```
//!
//! ## Callback mode
//!
//! The engine pulls bytes from a [`ByteSource`](orobas_core::ByteSource)
//! and pushes them into a [`ByteSink`](orobas_core::ByteSink); either side
//! may abort mid-stream. Callers that keep their own output history supply
//! a [`CopyWindow`](orobas_core::CopyWindow) and the engine stops keeping a
//! window at all:
//!
//! ```
//! use orobas_inflate::Inflater;
//! use orobas_core::SliceSource;
//!
//! let data = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
//! let mut engine = Inflater::new();
//! let mut output = Vec::new();
//! engine.decode(SliceSource::new(&data), &mut output).unwrap();
//! assert_eq!(output, b"Hello");
//! ```
//!
//! ## Table representations
//!
//! Huffman decoding is generic over [`huffman::CodeTable`]:
//! [`huffman::LookupTable`] trades a few kilobytes of table for single-probe
//! decodes, [`huffman::CompactTree`] keeps everything in fixed arrays for
//! constrained targets. `Inflater` defaults to the lookup table.

pub mod bits;
pub mod codec;
pub mod gzip;
pub mod huffman;
pub mod inflate;
pub mod zlib;

mod window;

// Re-export main types
pub use codec::{sniff_algorithm, DeflateDecompressor, GzipDecompressor, ZlibDecompressor};
pub use inflate::{decompress, inflate, inflate_into, inflate_with, InflateConfig, Inflater};
pub use window::WINDOW_SIZE;

// Re-export raw container functions for advanced use
pub use gzip::{gzip_decompress, gzip_decompress_to, gzip_decompress_with};
pub use zlib::{zlib_decompress, zlib_decompress_to, zlib_decompress_with};
