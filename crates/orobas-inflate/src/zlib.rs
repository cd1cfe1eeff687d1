//! Zlib container parsing (RFC 1950).
//!
//! Zlib framing is a 2-byte header (method, window size, header check) and
//! a big-endian Adler-32 trailer around one DEFLATE stream. Preset
//! dictionaries are not supported. As with gzip, the trailer is only read
//! when checksum verification is switched on.

use orobas_core::{Error, Result, SliceSource};

use crate::bits::BitReader;
use crate::inflate::{InflateConfig, Inflater};
use crate::window::RingTarget;

/// Zlib compression method: DEFLATE.
const CM_DEFLATE: u8 = 8;

/// Decompress zlib-wrapped data.
pub fn zlib_decompress(input: &[u8]) -> Result<Vec<u8>> {
    zlib_decompress_with(input, &InflateConfig::default())
}

/// Decompress zlib-wrapped data with explicit configuration.
pub fn zlib_decompress_with(input: &[u8], config: &InflateConfig) -> Result<Vec<u8>> {
    let mut bits = BitReader::new(SliceSource::new(input));

    let cmf = bits.read_bits(8)? as u8;
    let flg = bits.read_bits(8)? as u8;

    if cmf & 0x0F != CM_DEFLATE {
        return Err(Error::Unsupported(format!(
            "zlib compression method {}",
            cmf & 0x0F
        )));
    }
    if cmf >> 4 > 7 {
        return Err(Error::corrupted("zlib window size out of range"));
    }
    if ((cmf as u16) * 256 + flg as u16) % 31 != 0 {
        return Err(Error::corrupted("zlib header check failed"));
    }
    if flg & 0x20 != 0 {
        return Err(Error::Unsupported("zlib preset dictionary".into()));
    }

    let mut engine: Inflater = Inflater::with_config(config.clone());
    let mut output = Vec::new();
    let mut target = RingTarget::new(&mut output, config.profile);
    engine.decode_blocks(&mut bits, &mut target)?;

    if config.verify_checksum {
        bits.align();
        let mut trailer = [0u8; 4];
        for slot in trailer.iter_mut() {
            *slot = bits.read_bits(8)? as u8;
        }
        let stored_adler = u32::from_be_bytes(trailer);
        let computed_adler = adler32(&output);
        if stored_adler != computed_adler {
            return Err(Error::checksum_mismatch(stored_adler, computed_adler));
        }
    }

    Ok(output)
}

/// Decompress zlib data into an existing buffer.
pub fn zlib_decompress_to(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let decompressed = zlib_decompress(input)?;
    orobas_core::copy_into(decompressed, output)
}

/// Calculate Adler-32 checksum.
fn adler32(data: &[u8]) -> u32 {
    const MOD_ADLER: u32 = 65521;

    let mut a: u32 = 1;
    let mut b: u32 = 0;

    for &byte in data {
        a = (a + byte as u32) % MOD_ADLER;
        b = (b + a) % MOD_ADLER;
    }

    (b << 16) | a
}
