//! Gzip container parsing (RFC 1952).
//!
//! A gzip member wraps one DEFLATE stream with a 10-byte header, optional
//! metadata fields, and an 8-byte CRC-32 + ISIZE trailer. The decoder skips
//! every optional field; the trailer is left unread unless checksum
//! verification is switched on, in which case both values are checked
//! against the produced output.

use orobas_core::{ByteSource, Error, Result, SliceSource};
use tracing::debug;

use crate::bits::BitReader;
use crate::inflate::{InflateConfig, Inflater};
use crate::window::RingTarget;

/// Gzip magic number.
pub(crate) const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression method: DEFLATE.
const CM_DEFLATE: u8 = 8;

/// Header flags.
#[allow(dead_code)]
const FTEXT: u8 = 1;
const FHCRC: u8 = 2;
const FEXTRA: u8 = 4;
const FNAME: u8 = 8;
const FCOMMENT: u8 = 16;

/// Parse a member header, magic already consumed.
///
/// Leaves the reader positioned on the first DEFLATE byte.
pub(crate) fn read_member_header<S: ByteSource>(bits: &mut BitReader<S>) -> Result<()> {
    let method = bits.read_bits(8)? as u8;
    if method != CM_DEFLATE {
        return Err(Error::Unsupported(format!(
            "gzip compression method {method}"
        )));
    }

    let flags = bits.read_bits(8)? as u8;
    debug!(flags, "gzip member header");

    // MTIME (4), XFL, OS - nothing here affects decoding.
    for _ in 0..6 {
        bits.read_bits(8)?;
    }

    if flags & FEXTRA != 0 {
        let xlen = bits.read_aligned_u16()?;
        for _ in 0..xlen {
            bits.read_bits(8)?;
        }
    }

    if flags & FNAME != 0 {
        while bits.read_bits(8)? != 0 {}
    }

    if flags & FCOMMENT != 0 {
        while bits.read_bits(8)? != 0 {}
    }

    if flags & FHCRC != 0 {
        bits.read_bits(8)?;
        bits.read_bits(8)?;
    }

    Ok(())
}

/// Decompress gzip-wrapped data.
pub fn gzip_decompress(input: &[u8]) -> Result<Vec<u8>> {
    gzip_decompress_with(input, &InflateConfig::default())
}

/// Decompress gzip-wrapped data with explicit configuration.
///
/// With `verify_checksum` on, the CRC-32 and ISIZE trailer values are read
/// and compared against the output; otherwise the trailer stays unread.
pub fn gzip_decompress_with(input: &[u8], config: &InflateConfig) -> Result<Vec<u8>> {
    let mut bits = BitReader::new(SliceSource::new(input));

    let b0 = bits.read_bits(8)? as u8;
    let b1 = bits.read_bits(8)? as u8;
    if [b0, b1] != GZIP_MAGIC {
        return Err(Error::corrupted("missing gzip magic"));
    }
    read_member_header(&mut bits)?;

    let mut engine: Inflater = Inflater::with_config(config.clone());
    let mut output = Vec::new();
    let mut target = RingTarget::new(&mut output, config.profile);
    engine.decode_blocks(&mut bits, &mut target)?;

    if config.verify_checksum {
        bits.align();
        let mut trailer = [0u8; 8];
        for slot in trailer.iter_mut() {
            *slot = bits.read_bits(8)? as u8;
        }
        let stored_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let stored_size = u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);

        let computed_crc = crc32(&output);
        if stored_crc != computed_crc {
            return Err(Error::checksum_mismatch(stored_crc, computed_crc));
        }
        if stored_size != output.len() as u32 {
            return Err(Error::corrupted("trailer size does not match output"));
        }
    }

    Ok(output)
}

/// Decompress gzip data into an existing buffer.
pub fn gzip_decompress_to(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let decompressed = gzip_decompress(input)?;
    orobas_core::copy_into(decompressed, output)
}

/// CRC-32 lookup table.
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = 0xEDB88320 ^ (crc >> 1);
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Calculate CRC-32 checksum.
fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFFFFFF_u32;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = CRC32_TABLE[index] ^ (crc >> 8);
    }
    !crc
}
