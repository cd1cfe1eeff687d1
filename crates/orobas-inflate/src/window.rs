//! Output targets and the 32 KiB sliding window.
//!
//! DEFLATE back-references reach up to 32768 bytes into already-produced
//! output. The window is a fixed ring plus a cursor, indexed modulo the
//! window size, never a linked structure. Copies run one byte at a time so
//! an overlapping reference (distance shorter than length) re-reads bytes
//! it just produced, which is how the format expresses runs.
//!
//! Three configurations implement the same [`Target`] contract:
//!
//! - [`RingTarget`]: internal ring, every byte forwarded to a [`ByteSink`].
//! - [`SliceTarget`]: a caller buffer that is simultaneously the output and
//!   the window, so no separate 32 KiB scratch exists.
//! - [`HookTarget`]: literals go to the sink, back-references are delegated
//!   to the caller's [`CopyWindow`], which owns the history.

use orobas_core::{ByteSink, CopyWindow, Error, Profile, Result};

/// Sliding window size mandated by DEFLATE.
pub const WINDOW_SIZE: usize = 32 * 1024;

/// Where decoded bytes land.
///
/// `emit` places a single literal; `copy_backref` expands a length/distance
/// pair against whatever history the implementation keeps.
pub(crate) trait Target {
    fn emit(&mut self, byte: u8) -> Result<()>;
    fn copy_backref(&mut self, length: usize, distance: usize) -> Result<()>;
    /// Total bytes produced so far.
    fn produced(&self) -> usize;
}

// ============================================================================
// Internal ring window
// ============================================================================

/// Internal ring window forwarding each byte to a sink.
///
/// The ring starts zeroed, so a permissive decode of a stream whose first
/// back-reference reaches before the output start reads zeros rather than
/// stale memory.
pub(crate) struct RingTarget<'a, K: ByteSink> {
    sink: &'a mut K,
    ring: Box<[u8; WINDOW_SIZE]>,
    cursor: usize,
    strict: bool,
}

impl<'a, K: ByteSink> RingTarget<'a, K> {
    pub(crate) fn new(sink: &'a mut K, profile: Profile) -> Self {
        Self {
            sink,
            ring: Box::new([0u8; WINDOW_SIZE]),
            cursor: 0,
            strict: profile.is_strict(),
        }
    }
}

impl<K: ByteSink> Target for RingTarget<'_, K> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        if !self.sink.accept(byte) {
            return Err(Error::OutputRejected {
                offset: self.cursor,
            });
        }
        self.ring[self.cursor % WINDOW_SIZE] = byte;
        self.cursor += 1;
        Ok(())
    }

    fn copy_backref(&mut self, length: usize, distance: usize) -> Result<()> {
        if self.strict && distance > self.cursor {
            return Err(Error::corrupted("distance reaches before output start"));
        }
        for _ in 0..length {
            let byte = self.ring[self.cursor.wrapping_sub(distance) % WINDOW_SIZE];
            self.emit(byte)?;
        }
        Ok(())
    }

    fn produced(&self) -> usize {
        self.cursor
    }
}

// ============================================================================
// Caller buffer as output and window
// ============================================================================

/// Bounded target where the output buffer doubles as the window.
///
/// Back-references read already-written positions of the same buffer. When
/// the buffer fills before the stream ends, the overflow error reports
/// exactly how many bytes were written; all of them remain written.
pub(crate) struct SliceTarget<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceTarget<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Target for SliceTarget<'_> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        if self.pos == self.buf.len() {
            return Err(Error::TargetOverflow { written: self.pos });
        }
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    fn copy_backref(&mut self, length: usize, distance: usize) -> Result<()> {
        // Reaching before the buffer start is a bounds problem in every
        // profile; there is no ring behind this target to absorb it.
        if distance > self.pos {
            return Err(Error::corrupted("distance reaches before output start"));
        }
        for _ in 0..length {
            let byte = self.buf[self.pos - distance];
            self.emit(byte)?;
        }
        Ok(())
    }

    fn produced(&self) -> usize {
        self.pos
    }
}

// ============================================================================
// Caller-owned window
// ============================================================================

/// Target for callers that keep the back-reference history themselves.
///
/// Literals flow through the sink; every length/distance pair goes to the
/// caller's [`CopyWindow`]. Before the first real copy the hook receives
/// `(0, WINDOW_SIZE)` once, an allocation hint naming the maximum
/// look-behind distance the stream may use.
pub(crate) struct HookTarget<'a, K: ByteSink, W: CopyWindow> {
    sink: &'a mut K,
    window: &'a mut W,
    hinted: bool,
    produced: usize,
}

impl<'a, K: ByteSink, W: CopyWindow> HookTarget<'a, K, W> {
    pub(crate) fn new(sink: &'a mut K, window: &'a mut W) -> Self {
        Self {
            sink,
            window,
            hinted: false,
            produced: 0,
        }
    }
}

impl<K: ByteSink, W: CopyWindow> Target for HookTarget<'_, K, W> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        if !self.sink.accept(byte) {
            return Err(Error::OutputRejected {
                offset: self.produced,
            });
        }
        self.produced += 1;
        Ok(())
    }

    fn copy_backref(&mut self, length: usize, distance: usize) -> Result<()> {
        if !self.hinted {
            self.hinted = true;
            if !self.window.copy(0, WINDOW_SIZE as u32) {
                return Err(Error::WindowRejected {
                    length: 0,
                    distance: WINDOW_SIZE as u32,
                });
            }
        }
        if !self.window.copy(length as u32, distance as u32) {
            return Err(Error::WindowRejected {
                length: length as u32,
                distance: distance as u32,
            });
        }
        self.produced += length;
        Ok(())
    }

    fn produced(&self) -> usize {
        self.produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orobas_core::{FnSink, FnWindow};

    #[test]
    fn test_ring_emit_forwards_to_sink() {
        let mut out = Vec::new();
        let mut target = RingTarget::new(&mut out, Profile::Strict);
        for &b in b"abc" {
            target.emit(b).unwrap();
        }
        assert_eq!(target.produced(), 3);
        assert_eq!(out, b"abc");
    }

    #[test]
    fn test_ring_overlapping_copy_is_rle() {
        let mut out = Vec::new();
        let mut target = RingTarget::new(&mut out, Profile::Strict);
        target.emit(b'X').unwrap();
        target.copy_backref(5, 1).unwrap();
        assert_eq!(out, b"XXXXXX");
    }

    #[test]
    fn test_ring_copy_behind_start_strict_vs_permissive() {
        let mut out = Vec::new();
        let mut target = RingTarget::new(&mut out, Profile::Strict);
        target.emit(b'a').unwrap();
        assert!(target.copy_backref(2, 5).is_err());

        // The permissive ring is zero-initialised, so the same copy reads
        // zeros instead of failing.
        let mut out = Vec::new();
        let mut target = RingTarget::new(&mut out, Profile::Permissive);
        target.emit(b'a').unwrap();
        target.copy_backref(2, 5).unwrap();
        assert_eq!(out, [b'a', 0, 0]);
    }

    #[test]
    fn test_ring_rejecting_sink_aborts() {
        let mut accepted = 0usize;
        let mut sink = FnSink::new(|_: u8| {
            accepted += 1;
            accepted <= 2
        });
        let mut target = RingTarget::new(&mut sink, Profile::Strict);
        target.emit(1).unwrap();
        target.emit(2).unwrap();
        let err = target.emit(3).unwrap_err();
        assert_eq!(err.result_code(), 2);
    }

    #[test]
    fn test_ring_wraps_past_window_size() {
        let mut out = Vec::new();
        let mut last = 0u8;
        {
            let mut target = RingTarget::new(&mut out, Profile::Strict);
            for i in 0..WINDOW_SIZE + 10 {
                last = (i % 251) as u8;
                target.emit(last).unwrap();
            }
            // A distance-1 copy after wrap still sees the latest byte.
            target.copy_backref(1, 1).unwrap();
        }
        assert_eq!(*out.last().unwrap(), last);
    }

    #[test]
    fn test_slice_target_exact_fill_then_overflow() {
        let mut buf = [0u8; 4];
        let mut target = SliceTarget::new(&mut buf);
        target.emit(b'a').unwrap();
        // Copy runs the buffer to capacity and then one past.
        let err = target.copy_backref(4, 1).unwrap_err();
        match err {
            Error::TargetOverflow { written } => assert_eq!(written, 4),
            other => panic!("expected overflow, got {other:?}"),
        }
        assert_eq!(&buf, b"aaaa");
    }

    #[test]
    fn test_slice_target_backref_reads_own_output() {
        let mut buf = [0u8; 6];
        let mut target = SliceTarget::new(&mut buf);
        for &b in b"ab" {
            target.emit(b).unwrap();
        }
        target.copy_backref(4, 2).unwrap();
        assert_eq!(&buf, b"ababab");
    }

    #[test]
    fn test_slice_target_distance_before_start_errors() {
        let mut buf = [0u8; 4];
        let mut target = SliceTarget::new(&mut buf);
        target.emit(b'a').unwrap();
        assert!(target.copy_backref(1, 2).is_err());
    }

    #[test]
    fn test_hook_receives_hint_then_copies() {
        let mut calls: Vec<(u32, u32)> = Vec::new();
        let mut out = Vec::new();
        {
            let mut window = FnWindow::new(|length: u32, distance: u32| {
                calls.push((length, distance));
                true
            });
            let mut target = HookTarget::new(&mut out, &mut window);
            target.emit(b'Q').unwrap();
            target.copy_backref(3, 1).unwrap();
            target.copy_backref(7, 2).unwrap();
            assert_eq!(target.produced(), 11);
        }
        assert_eq!(calls, vec![(0, 32768), (3, 1), (7, 2)]);
        // Only the literal went through the sink.
        assert_eq!(out, b"Q");
    }

    #[test]
    fn test_hook_rejection_maps_to_window_error() {
        let mut out = Vec::new();
        let mut window = FnWindow::new(|length: u32, _distance: u32| length == 0);
        let mut target = HookTarget::new(&mut out, &mut window);
        let err = target.copy_backref(3, 1).unwrap_err();
        assert_eq!(err.result_code(), 3);
    }

    #[test]
    fn test_hook_rejecting_hint_aborts() {
        let mut out = Vec::new();
        let mut window = FnWindow::new(|_: u32, _: u32| false);
        let mut target = HookTarget::new(&mut out, &mut window);
        let err = target.copy_backref(3, 1).unwrap_err();
        match err {
            Error::WindowRejected { length, distance } => {
                assert_eq!((length, distance), (0, 32768));
            }
            other => panic!("expected window rejection, got {other:?}"),
        }
    }
}
