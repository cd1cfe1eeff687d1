//! DEFLATE decompression (RFC 1951) with container sniffing.
//!
//! The engine is a single synchronous pipeline: the bit reader pulls bytes
//! from the source, Huffman tables turn bits into symbols, and the window
//! target stitches literals and back-references into the output. Every
//! emitted byte is an abort point for the caller's sink, and every copy for
//! the caller's window hook.

use core::marker::PhantomData;

use orobas_core::{
    Algorithm, ByteSink, ByteSource, CopyWindow, DecompressionStats, Error, Profile, Result,
    SliceSource,
};
use tracing::debug;

use crate::bits::BitReader;
use crate::gzip;
use crate::huffman::{
    CodeTable, LookupTable, CL_CODE_ORDER, DISTANCE_BASE, DISTANCE_EXTRA_BITS, FIXED_DIST_LENGTHS,
    FIXED_LIT_LENGTHS, LENGTH_BASE, LENGTH_EXTRA_BITS, MAX_CL_CODES, MAX_DIST_CODES, MAX_LIT_CODES,
};
use crate::window::{HookTarget, RingTarget, SliceTarget, Target};

/// Decoder configuration.
///
/// `verify_checksum` is honoured by the container helpers
/// ([`crate::gzip_decompress_with`], [`crate::zlib_decompress_with`]); the
/// block engine itself never reads a container trailer, so callers that need
/// validation in callback mode must layer it over their own sink.
#[derive(Debug, Clone, Default)]
pub struct InflateConfig {
    /// Validation profile for the bitstream.
    pub profile: Profile,
    /// Verify the container checksum after decoding (gzip CRC-32 and
    /// ISIZE, zlib Adler-32). Off by default; the trailer is then left
    /// unread.
    pub verify_checksum: bool,
}

/// DEFLATE decoding engine.
///
/// The type parameter selects the Huffman table representation:
/// [`LookupTable`] (default, single-probe decode) or
/// [`crate::huffman::CompactTree`] (fixed-size packed nodes). The contract
/// is identical either way.
pub struct Inflater<T: CodeTable = LookupTable> {
    config: InflateConfig,
    stats: DecompressionStats,
    _table: PhantomData<T>,
}

impl Inflater<LookupTable> {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InflateConfig::default())
    }
}

impl Default for Inflater<LookupTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CodeTable> Inflater<T> {
    /// Create an engine with the given configuration.
    pub fn with_config(config: InflateConfig) -> Self {
        Self {
            config,
            stats: DecompressionStats::new(),
            _table: PhantomData,
        }
    }

    /// Statistics from the most recent decode, including partial ones.
    pub fn stats(&self) -> &DecompressionStats {
        &self.stats
    }

    /// Decode a stream, sniffing the container, with the internal window.
    ///
    /// A leading `1F 8B` magic selects gzip framing (the member header is
    /// parsed and skipped, the trailer left unread); anything else is taken
    /// as raw DEFLATE with those two bytes as its start.
    pub fn decode<S: ByteSource, K: ByteSink>(&mut self, source: S, sink: &mut K) -> Result<()> {
        self.stats = DecompressionStats::new();
        let mut bits = BitReader::new(source);
        let algorithm = sniff_container(&mut bits)?;
        let mut target = RingTarget::new(sink, self.config.profile);
        let result = self.decode_blocks(&mut bits, &mut target);
        self.stats.algorithm = Some(algorithm);
        self.stats.compressed_size = bits.bytes_read();
        self.stats.output_size = target.produced();
        result
    }

    /// Decode into a bounded buffer that doubles as the window.
    ///
    /// On success returns the number of bytes written. If the stream
    /// expands past the buffer, exactly `target.len()` bytes are written
    /// and the overflow error is returned.
    pub fn decode_into<S: ByteSource>(&mut self, source: S, target: &mut [u8]) -> Result<usize> {
        self.stats = DecompressionStats::new();
        let mut bits = BitReader::new(source);
        let algorithm = sniff_container(&mut bits)?;
        let mut target = SliceTarget::new(target);
        let result = self.decode_blocks(&mut bits, &mut target);
        let written = target.produced();
        self.stats.algorithm = Some(algorithm);
        self.stats.compressed_size = bits.bytes_read();
        self.stats.output_size = written;
        result.map(|()| written)
    }

    /// Decode with a caller-owned window.
    ///
    /// Literals flow through `sink`; back-references are delegated to
    /// `window`, which receives the `(0, 32768)` allocation hint before the
    /// first copy.
    pub fn decode_with_window<S, K, W>(
        &mut self,
        source: S,
        sink: &mut K,
        window: &mut W,
    ) -> Result<()>
    where
        S: ByteSource,
        K: ByteSink,
        W: CopyWindow,
    {
        self.stats = DecompressionStats::new();
        let mut bits = BitReader::new(source);
        let algorithm = sniff_container(&mut bits)?;
        let mut target = HookTarget::new(sink, window);
        let result = self.decode_blocks(&mut bits, &mut target);
        self.stats.algorithm = Some(algorithm);
        self.stats.compressed_size = bits.bytes_read();
        self.stats.output_size = target.produced();
        result
    }

    /// Run the block loop until the final block completes.
    pub(crate) fn decode_blocks<S: ByteSource>(
        &mut self,
        bits: &mut BitReader<S>,
        target: &mut dyn Target,
    ) -> Result<()> {
        loop {
            let bfinal = bits.read_bits(1)? == 1;
            let btype = bits.read_bits(2)?;
            debug!(bfinal, btype, "block header");

            match btype {
                0 => self.stored_block(bits, target)?,
                1 => self.fixed_block(bits, target)?,
                2 => self.dynamic_block(bits, target)?,
                _ => return Err(Error::corrupted("reserved block type")),
            }

            self.stats.blocks_processed += 1;
            if bfinal {
                break;
            }
        }
        Ok(())
    }

    /// Stored block: byte-aligned LEN/NLEN header, then raw bytes.
    fn stored_block<S: ByteSource>(
        &self,
        bits: &mut BitReader<S>,
        target: &mut dyn Target,
    ) -> Result<()> {
        let len = bits.read_aligned_u16()?;
        let nlen = bits.read_aligned_u16()?;

        if self.config.profile.is_strict() && len != !nlen {
            return Err(Error::corrupted("stored block length mismatch"));
        }

        for _ in 0..len {
            let byte = bits.read_bits(8)? as u8;
            target.emit(byte)?;
        }
        Ok(())
    }

    /// Fixed-code block: the hard-coded tables of RFC 1951 section 3.2.6.
    fn fixed_block<S: ByteSource>(
        &self,
        bits: &mut BitReader<S>,
        target: &mut dyn Target,
    ) -> Result<()> {
        let lit_table = T::from_lengths(&FIXED_LIT_LENGTHS)?;
        let dist_table = T::from_lengths(&FIXED_DIST_LENGTHS)?;
        self.compressed_block(bits, target, &lit_table, &dist_table)
    }

    /// Dynamic block: decode the transmitted code lengths, build both
    /// tables, then decode as usual.
    fn dynamic_block<S: ByteSource>(
        &self,
        bits: &mut BitReader<S>,
        target: &mut dyn Target,
    ) -> Result<()> {
        let (lit_table, dist_table) = self.dynamic_tables(bits)?;
        self.compressed_block(bits, target, &lit_table, &dist_table)
    }

    fn dynamic_tables<S: ByteSource>(&self, bits: &mut BitReader<S>) -> Result<(T, T)> {
        let hlit = bits.read_bits(5)? as usize + 257;
        let hdist = bits.read_bits(5)? as usize + 1;
        let hclen = bits.read_bits(4)? as usize + 4;

        if hlit > MAX_LIT_CODES || hdist > MAX_DIST_CODES {
            return Err(Error::corrupted("code count out of range"));
        }

        let mut cl_lengths = [0u8; MAX_CL_CODES];
        for &slot in CL_CODE_ORDER.iter().take(hclen) {
            cl_lengths[slot] = bits.read_bits(3)? as u8;
        }
        let cl_table = T::from_lengths(&cl_lengths)?;

        let mut lengths = vec![0u8; hlit + hdist];
        let mut i = 0;
        while i < lengths.len() {
            let sym = cl_table.decode(bits)?;
            match sym {
                0..=15 => {
                    lengths[i] = sym as u8;
                    i += 1;
                }
                16 => {
                    if i == 0 {
                        return Err(Error::corrupted("length repeat with no previous length"));
                    }
                    let count = bits.read_bits(2)? as usize + 3;
                    if i + count > lengths.len() {
                        return Err(Error::corrupted("length repeat overruns alphabets"));
                    }
                    let prev = lengths[i - 1];
                    lengths[i..i + count].fill(prev);
                    i += count;
                }
                17 => {
                    let count = bits.read_bits(3)? as usize + 3;
                    if i + count > lengths.len() {
                        return Err(Error::corrupted("zero repeat overruns alphabets"));
                    }
                    i += count;
                }
                18 => {
                    let count = bits.read_bits(7)? as usize + 11;
                    if i + count > lengths.len() {
                        return Err(Error::corrupted("zero repeat overruns alphabets"));
                    }
                    i += count;
                }
                _ => return Err(Error::corrupted("invalid code length symbol")),
            }
        }

        let lit_table = T::from_lengths(&lengths[..hlit])?;
        let dist_table = T::from_lengths(&lengths[hlit..])?;
        Ok((lit_table, dist_table))
    }

    /// Symbol loop shared by fixed and dynamic blocks.
    fn compressed_block<S: ByteSource>(
        &self,
        bits: &mut BitReader<S>,
        target: &mut dyn Target,
        lit_table: &T,
        dist_table: &T,
    ) -> Result<()> {
        loop {
            let sym = lit_table.decode(bits)?;
            match sym {
                0..=255 => target.emit(sym as u8)?,
                256 => break,
                257..=285 => {
                    let idx = (sym - 257) as usize;
                    let length = LENGTH_BASE[idx] as usize
                        + bits.read_bits(LENGTH_EXTRA_BITS[idx] as u32)? as usize;

                    let dist_sym = dist_table.decode(bits)? as usize;
                    if dist_sym >= MAX_DIST_CODES {
                        return Err(Error::corrupted("reserved distance code"));
                    }
                    let distance = DISTANCE_BASE[dist_sym] as usize
                        + bits.read_bits(DISTANCE_EXTRA_BITS[dist_sym] as u32)? as usize;

                    target.copy_backref(length, distance)?;
                }
                _ => return Err(Error::corrupted("invalid literal/length code")),
            }
        }
        Ok(())
    }
}

/// Peek at the first two bytes and consume the gzip member header when
/// they carry the magic.
fn sniff_container<S: ByteSource>(bits: &mut BitReader<S>) -> Result<Algorithm> {
    let b0 = bits.read_bits(8)? as u8;
    let b1 = bits.read_bits(8)? as u8;
    if [b0, b1] == gzip::GZIP_MAGIC {
        gzip::read_member_header(bits)?;
        Ok(Algorithm::Gzip)
    } else {
        bits.push_back(&[b0, b1]);
        Ok(Algorithm::Deflate)
    }
}

/// Inflate a raw DEFLATE stream into a vector.
pub fn inflate(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    inflate_with(input, output, &InflateConfig::default())
}

/// Inflate a raw DEFLATE stream with explicit configuration.
pub fn inflate_with(input: &[u8], output: &mut Vec<u8>, config: &InflateConfig) -> Result<()> {
    let mut engine: Inflater = Inflater::with_config(config.clone());
    let mut bits = BitReader::new(SliceSource::new(input));
    let mut target = RingTarget::new(output, config.profile);
    engine.decode_blocks(&mut bits, &mut target)
}

/// Inflate a raw DEFLATE stream into a bounded buffer.
///
/// The buffer doubles as the back-reference window; no 32 KiB scratch is
/// kept. Returns the number of bytes written.
pub fn inflate_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut engine: Inflater = Inflater::new();
    let mut bits = BitReader::new(SliceSource::new(input));
    let mut target = SliceTarget::new(output);
    let result = engine.decode_blocks(&mut bits, &mut target);
    let written = target.produced();
    result.map(|()| written)
}

/// Decompress a stream, auto-detecting gzip framing.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut engine: Inflater = Inflater::new();
    let mut output = Vec::new();
    engine.decode(SliceSource::new(input), &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fixed_stream() {
        // BFINAL=1, BTYPE=01, immediately end-of-block.
        let data = [0x03, 0x00];
        let mut output = Vec::new();
        inflate(&data, &mut output).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_fixed_hello() {
        let data = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
        let mut output = Vec::new();
        inflate(&data, &mut output).unwrap();
        assert_eq!(output, b"Hello");
    }

    #[test]
    fn test_stored_block() {
        let data = [
            0x01, // BFINAL=1, BTYPE=00
            0x04, 0x00, // LEN = 4
            0xFB, 0xFF, // NLEN = !4
            b'D', b'E', b'A', b'D',
        ];
        let mut output = Vec::new();
        inflate(&data, &mut output).unwrap();
        assert_eq!(output, b"DEAD");
    }

    #[test]
    fn test_stored_block_length_mismatch() {
        let data = [0x01, 0x04, 0x00, 0x00, 0x00, b'D', b'E', b'A', b'D'];

        let mut output = Vec::new();
        let err = inflate(&data, &mut output).unwrap_err();
        assert_eq!(err.result_code(), 1);

        // The permissive profile takes LEN at face value.
        let config = InflateConfig {
            profile: Profile::Permissive,
            ..Default::default()
        };
        let mut output = Vec::new();
        inflate_with(&data, &mut output, &config).unwrap();
        assert_eq!(output, b"DEAD");
    }

    #[test]
    fn test_reserved_block_type() {
        // BFINAL=1, BTYPE=11.
        let data = [0x07, 0x00];
        let mut output = Vec::new();
        let err = inflate(&data, &mut output).unwrap_err();
        assert_eq!(err.result_code(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mut output = Vec::new();
        let err = inflate(&[], &mut output).unwrap_err();
        assert_eq!(err.result_code(), 1);
    }

    #[test]
    fn test_truncated_stored_block() {
        let data = [0x01, 0x04, 0x00, 0xFB, 0xFF, b'D', b'E'];
        let mut output = Vec::new();
        let err = inflate(&data, &mut output).unwrap_err();
        assert_eq!(err.result_code(), 1);
        // Bytes decoded before the truncation stay emitted.
        assert_eq!(output, b"DE");
    }

    #[test]
    fn test_decode_sniffs_raw_deflate() {
        let mut engine = Inflater::new();
        let mut output = Vec::new();
        engine
            .decode(SliceSource::new(&[0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00]), &mut output)
            .unwrap();
        assert_eq!(output, b"Hello");
        assert_eq!(engine.stats().algorithm, Some(Algorithm::Deflate));
        assert_eq!(engine.stats().output_size, 5);
        assert_eq!(engine.stats().blocks_processed, 1);
    }

    #[test]
    fn test_multiple_blocks_counted() {
        // Two stored blocks: "AB" then final "C".
        let data = [
            0x00, 0x02, 0x00, 0xFD, 0xFF, b'A', b'B', // BFINAL=0
            0x01, 0x01, 0x00, 0xFE, 0xFF, b'C', // BFINAL=1
        ];
        let mut engine = Inflater::new();
        let mut output = Vec::new();
        engine.decode(SliceSource::new(&data), &mut output).unwrap();
        assert_eq!(output, b"ABC");
        assert_eq!(engine.stats().blocks_processed, 2);
    }

    #[test]
    fn test_inflate_into_bounded() {
        let data = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
        let mut buf = [0u8; 16];
        let written = inflate_into(&data, &mut buf).unwrap();
        assert_eq!(written, 5);
        assert_eq!(&buf[..5], b"Hello");
    }

    #[test]
    fn test_output_rejection_stops_decode() {
        let data = [0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00];
        let mut engine = Inflater::new();
        let mut seen = 0usize;
        let mut sink = orobas_core::FnSink::new(|_: u8| {
            seen += 1;
            seen <= 2
        });
        let err = engine.decode(SliceSource::new(&data), &mut sink).unwrap_err();
        assert_eq!(err.result_code(), 2);
        assert_eq!(engine.stats().output_size, 2);
    }
}
