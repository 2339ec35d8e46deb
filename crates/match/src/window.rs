//! crates/match/src/window.rs
//!
//! Buffered view over the source stream used by the delta scan.
//!
//! The window covers the inclusive range `[k_idx, l_idx]` of a buffer sized
//! [`ChunkSize::buffer_len`]. A weak checksum of the window is maintained as
//! it advances one byte at a time, and recomputed after a whole-chunk jump.
//! When the next position would run past the buffered bytes the unconsumed
//! tail is moved to the front of the buffer and the rest is refilled from the
//! stream.

use std::io::Read;

use checksums::RollingChecksum;
use signature::{ChunkSize, read_full};

use crate::error::MatchError;

/// Outcome of advancing the window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Advance {
    /// The window now covers a full chunk at the new position.
    Moved,
    /// The stream ended before a full chunk could be formed. The unconsumed
    /// bytes are available through [`SlidingWindow::remaining`].
    Exhausted,
}

/// Sliding window over a source stream.
#[derive(Debug)]
pub struct SlidingWindow<R> {
    reader: R,
    chunk_len: usize,
    buffer: Vec<u8>,
    k_idx: usize,
    l_idx: usize,
    cap: usize,
    tail_start: usize,
    read_bytes: u64,
    checksum: RollingChecksum,
    primed: bool,
    at_eof: bool,
    exhausted: bool,
}

impl<R: Read> SlidingWindow<R> {
    /// Creates a window over `reader`. No bytes are read until
    /// [`prime`](Self::prime) is called.
    pub fn new(reader: R, chunk_size: ChunkSize) -> Self {
        Self {
            reader,
            chunk_len: chunk_size.get(),
            buffer: vec![0; chunk_size.buffer_len()],
            k_idx: 0,
            l_idx: 0,
            cap: 0,
            tail_start: 0,
            read_bytes: 0,
            checksum: RollingChecksum::new(),
            primed: false,
            at_eof: false,
            exhausted: false,
        }
    }

    /// Performs the initial fill and positions the window at `[0, CHUNK_SIZE-1]`.
    ///
    /// Returns [`Advance::Exhausted`] when the stream holds less than one
    /// chunk; every buffered byte is then reported by
    /// [`remaining`](Self::remaining). Calling this again is a no-op.
    pub fn prime(&mut self) -> Result<Advance, MatchError> {
        if self.primed {
            return Ok(self.status());
        }
        self.primed = true;
        self.fill_from(0)?;

        if self.cap < self.chunk_len {
            self.tail_start = 0;
            self.exhausted = true;
            return Ok(Advance::Exhausted);
        }

        self.k_idx = 0;
        self.l_idx = self.chunk_len - 1;
        self.checksum.update_from_block(&self.buffer[..self.chunk_len]);
        Ok(Advance::Moved)
    }

    /// Weak checksum of the current window.
    pub fn checksum(&self) -> u32 {
        self.checksum.value()
    }

    /// Bytes currently covered by the window.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::WindowSize`] if the window does not span exactly
    /// one chunk, which only happens before priming or after exhaustion.
    pub fn window(&self) -> Result<&[u8], MatchError> {
        let actual = if self.exhausted || !self.primed {
            0
        } else {
            self.l_idx + 1 - self.k_idx
        };
        if actual != self.chunk_len {
            return Err(MatchError::WindowSize {
                expected: self.chunk_len,
                actual,
            });
        }
        Ok(&self.buffer[self.k_idx..=self.l_idx])
    }

    /// Leftmost byte of the window.
    pub fn leftmost(&self) -> u8 {
        self.buffer[self.k_idx]
    }

    /// Slides the window right by one byte after its leftmost byte has been
    /// consumed as a literal.
    pub fn advance_byte(&mut self) -> Result<Advance, MatchError> {
        if self.exhausted {
            return Ok(Advance::Exhausted);
        }
        if self.cap <= self.l_idx + 1 {
            self.refill()?;
            if self.cap <= self.l_idx + 1 {
                self.tail_start = self.k_idx + 1;
                self.exhausted = true;
                return Ok(Advance::Exhausted);
            }
        }

        let outgoing = self.buffer[self.k_idx];
        let incoming = self.buffer[self.l_idx + 1];
        self.k_idx += 1;
        self.l_idx += 1;
        self.checksum.roll(outgoing, incoming)?;
        Ok(Advance::Moved)
    }

    /// Jumps the window right by one chunk after the whole window matched a
    /// reference chunk.
    pub fn advance_chunk(&mut self) -> Result<Advance, MatchError> {
        if self.exhausted {
            return Ok(Advance::Exhausted);
        }
        if self.cap <= self.l_idx + self.chunk_len {
            self.refill()?;
            if self.cap <= self.l_idx + self.chunk_len {
                self.tail_start = self.l_idx + 1;
                self.exhausted = true;
                return Ok(Advance::Exhausted);
            }
        }

        self.k_idx += self.chunk_len;
        self.l_idx += self.chunk_len;
        self.checksum
            .update_from_block(&self.buffer[self.k_idx..=self.l_idx]);
        Ok(Advance::Moved)
    }

    /// Unconsumed bytes left once the window is exhausted.
    ///
    /// Empty while the window can still advance.
    pub fn remaining(&self) -> &[u8] {
        if self.exhausted {
            &self.buffer[self.tail_start..self.cap]
        } else {
            &[]
        }
    }

    /// Total bytes read from the stream so far.
    pub const fn read_bytes(&self) -> u64 {
        self.read_bytes
    }

    fn status(&self) -> Advance {
        if self.exhausted {
            Advance::Exhausted
        } else {
            Advance::Moved
        }
    }

    /// Moves `[k_idx, cap)` to the front, tops the buffer up and rebases the
    /// window to `[0, CHUNK_SIZE-1]`.
    fn refill(&mut self) -> Result<(), MatchError> {
        if self.at_eof {
            return Ok(());
        }
        let kept = self.cap - self.k_idx;
        self.buffer.copy_within(self.k_idx..self.cap, 0);
        self.k_idx = 0;
        self.l_idx = self.chunk_len - 1;
        self.fill_from(kept)?;
        logging::debug_delta!(kept, cap = self.cap, "refilled scan buffer");
        Ok(())
    }

    fn fill_from(&mut self, start: usize) -> Result<(), MatchError> {
        let read = read_full(&mut self.reader, &mut self.buffer[start..])?;
        if read < self.buffer.len() - start {
            self.at_eof = true;
        }
        self.cap = start + read;
        self.read_bytes += read as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn size(len: u64) -> ChunkSize {
        ChunkSize::new(len).expect("chunk size")
    }

    /// Hands out at most `step` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_stream_is_exhausted_on_prime() {
        let mut window = SlidingWindow::new(Cursor::new(b"abc".to_vec()), size(4));
        assert_eq!(window.prime().unwrap(), Advance::Exhausted);
        assert_eq!(window.remaining(), b"abc");
        assert!(window.window().is_err());
    }

    #[test]
    fn empty_stream_has_nothing_remaining() {
        let mut window = SlidingWindow::new(io::empty(), size(4));
        assert_eq!(window.prime().unwrap(), Advance::Exhausted);
        assert!(window.remaining().is_empty());
        assert_eq!(window.read_bytes(), 0);
    }

    #[test]
    fn byte_advance_tracks_recomputed_checksum() {
        let data: Vec<u8> = (0..200u8).map(|b| b.wrapping_mul(37)).collect();
        let mut window = SlidingWindow::new(Cursor::new(data.clone()), size(8));
        assert_eq!(window.prime().unwrap(), Advance::Moved);

        let mut start = 0;
        loop {
            let expected = RollingChecksum::from_bytes(&data[start..start + 8]).value();
            assert_eq!(window.checksum(), expected, "offset {start}");
            assert_eq!(window.window().unwrap(), &data[start..start + 8]);
            assert_eq!(window.leftmost(), data[start]);
            match window.advance_byte().unwrap() {
                Advance::Moved => start += 1,
                Advance::Exhausted => break,
            }
        }
        assert_eq!(start, data.len() - 8);
        assert_eq!(window.remaining(), &data[start + 1..]);
        assert_eq!(window.read_bytes(), data.len() as u64);
    }

    #[test]
    fn chunk_advance_leaves_unmatched_tail() {
        let data: Vec<u8> = (0..30u8).collect();
        let mut window = SlidingWindow::new(Cursor::new(data.clone()), size(8));
        window.prime().unwrap();

        assert_eq!(window.advance_chunk().unwrap(), Advance::Moved);
        assert_eq!(window.window().unwrap(), &data[8..16]);
        assert_eq!(window.advance_chunk().unwrap(), Advance::Moved);
        assert_eq!(window.window().unwrap(), &data[16..24]);
        assert_eq!(
            window.checksum(),
            RollingChecksum::from_bytes(&data[16..24]).value()
        );
        assert_eq!(window.advance_chunk().unwrap(), Advance::Exhausted);
        assert_eq!(window.remaining(), &data[24..]);
    }

    #[test]
    fn short_reads_do_not_end_the_scan_early() {
        let data: Vec<u8> = (0..100u8).collect();
        let reader = Trickle {
            data: &data,
            step: 3,
        };
        let mut window = SlidingWindow::new(reader, size(4));
        window.prime().unwrap();

        let mut start = 0;
        while window.advance_chunk().unwrap() == Advance::Moved {
            start += 4;
            assert_eq!(window.window().unwrap(), &data[start..start + 4]);
        }
        assert_eq!(start, 96);
        assert!(window.remaining().is_empty());
    }

    #[test]
    fn prime_twice_keeps_position() {
        let mut window = SlidingWindow::new(Cursor::new(vec![1u8; 16]), size(4));
        window.prime().unwrap();
        window.advance_byte().unwrap();
        assert_eq!(window.prime().unwrap(), Advance::Moved);
        assert_eq!(window.read_bytes(), 16);
    }
}
