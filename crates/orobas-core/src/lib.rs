//! # Orobas Core
//!
//! Core traits and types for the Orobas decompression library.
//!
//! Orobas is named after the 55th demon of the Ars Goetia, who gives true
//! answers of things past and hidden - just as decompression recovers data
//! in its original form.
//!
//! ## Design Philosophy
//!
//! - **Capability parameters**: input, output, and window are independent
//!   pluggable slots, not one monolithic stream type
//! - **Tiny-footprint friendly**: the decode core is written so a
//!   constrained port needs only fixed-size scratch
//! - **One error channel**: all failures travel as [`Error`] values; the
//!   legacy integer result codes stay recoverable via
//!   [`Error::result_code`]
//!
//! ## Core Traits
//!
//! - [`ByteSource`] - Supplies compressed bytes
//! - [`ByteSink`] - Consumes decoded bytes, may refuse to abort
//! - [`CopyWindow`] - Caller-owned back-reference history
//! - [`Decompressor`] - One-shot decompression operations

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{
    copy_into, ByteSink, ByteSource, CopyWindow, Decompressor, FnSink, FnSource, FnWindow,
    SliceSource,
};
pub use types::{Algorithm, DecompressionStats, Profile};
