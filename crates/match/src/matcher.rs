//! crates/match/src/matcher.rs
//!
//! Delta scan state machine.
//!
//! The matcher slides a chunk-sized window over the source. At each position
//! the weak checksum selects candidate reference chunks; a candidate is only
//! accepted after its strong digest matches the window. Accepted chunks are
//! removed from the index so each reference chunk backs at most one
//! reference packet. Bytes that fall out of the window without a match are
//! accumulated and emitted as literal packets of at most one chunk.

use std::io::Read;
use std::mem;

use checksums::StrongDigest;
use signature::ChunkIndex;

use crate::error::MatchError;
use crate::response::{Response, ResponsePacket};
use crate::window::{Advance, SlidingWindow};

/// Scan phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchState {
    /// Sliding over the source looking for chunk matches.
    Scanning,
    /// The source is exhausted; pending and leftover bytes are being emitted.
    FlushingTail,
    /// The response is complete.
    Done,
}

/// Counters collected during a scan.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchStats {
    /// Reference packets emitted.
    pub matched_chunks: u64,
    /// Bytes covered by reference packets.
    pub matched_bytes: u64,
    /// Literal packets emitted.
    pub literal_packets: u64,
    /// Bytes carried by literal packets.
    pub literal_bytes: u64,
    /// Weak checksum hits whose strong digest did not match.
    pub integrity_warnings: u64,
    /// Bytes read from the source.
    pub source_bytes: u64,
}

/// Produces a [`Response`] for a source stream against a [`ChunkIndex`].
#[derive(Debug)]
pub struct DeltaMatcher<R> {
    index: ChunkIndex,
    window: SlidingWindow<R>,
    state: MatchState,
    pending: Vec<u8>,
    response: Response,
    stats: MatchStats,
}

impl<R: Read> DeltaMatcher<R> {
    /// Creates a matcher over `source` using the chunk size of `index`.
    pub fn new(index: ChunkIndex, source: R) -> Self {
        let chunk_size = index.chunk_size();
        Self {
            window: SlidingWindow::new(source, chunk_size),
            pending: Vec::with_capacity(chunk_size.get()),
            index,
            state: MatchState::Scanning,
            response: Response::new(),
            stats: MatchStats::default(),
        }
    }

    /// Scans the whole source and returns the response.
    ///
    /// # Errors
    ///
    /// Fails on source I/O errors and with [`MatchError::Finished`] when
    /// called again after a completed scan.
    pub fn run(&mut self) -> Result<Response, MatchError> {
        if self.state == MatchState::Done {
            return Err(MatchError::Finished);
        }

        if self.window.prime()? == Advance::Exhausted {
            self.state = MatchState::FlushingTail;
        }

        loop {
            match self.state {
                MatchState::Scanning => self.step()?,
                MatchState::FlushingTail => self.flush_tail(),
                MatchState::Done => break,
            }
        }

        self.stats.source_bytes = self.window.read_bytes();
        logging::trace_stats!(
            matched_chunks = self.stats.matched_chunks,
            literal_bytes = self.stats.literal_bytes,
            integrity_warnings = self.stats.integrity_warnings,
            source_bytes = self.stats.source_bytes,
            "delta scan complete"
        );
        Ok(mem::take(&mut self.response))
    }

    /// Current phase.
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Counters collected so far.
    pub const fn stats(&self) -> MatchStats {
        self.stats
    }

    /// Index with every matched chunk removed from candidate lookup.
    pub const fn index(&self) -> &ChunkIndex {
        &self.index
    }

    /// Consumes the matcher and returns its index.
    pub fn into_index(self) -> ChunkIndex {
        self.index
    }

    fn step(&mut self) -> Result<(), MatchError> {
        let weak = self.window.checksum();
        if let Some(chunk_index) = self.find_match(weak)? {
            self.flush_pending();
            logging::trace_delta!(index = chunk_index, "B");
            self.response.push(ResponsePacket::reference(chunk_index));
            self.stats.matched_chunks += 1;
            self.stats.matched_bytes += self.index.chunk_size().as_u64();
            if self.window.advance_chunk()? == Advance::Exhausted {
                self.state = MatchState::FlushingTail;
            }
            return Ok(());
        }

        self.pending.push(self.window.leftmost());
        if self.pending.len() == self.index.chunk_size().get() {
            self.flush_pending();
        }
        if self.window.advance_byte()? == Advance::Exhausted {
            self.state = MatchState::FlushingTail;
        }
        Ok(())
    }

    /// Returns the index of the first candidate whose strong digest matches
    /// the window, consuming it from the index.
    fn find_match(&mut self, weak: u32) -> Result<Option<u64>, MatchError> {
        let candidates = self.index.candidates(weak);
        if candidates.is_empty() {
            return Ok(None);
        }

        let strong = StrongDigest::compute(self.window.window()?);
        let chunks = self.index.chunks();
        let slot = candidates
            .iter()
            .position(|&position| chunks[position].strong() == &strong);

        let Some(slot) = slot else {
            self.stats.integrity_warnings += 1;
            logging::warn_integrity!(
                weak,
                strong = %strong,
                candidates = candidates.len(),
                "weak checksum matched but strong digest differs"
            );
            return Ok(None);
        };

        Ok(self.index.consume(weak, slot).map(|chunk| chunk.index()))
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let literal = mem::replace(
            &mut self.pending,
            Vec::with_capacity(self.index.chunk_size().get()),
        );
        self.emit_literal(literal);
    }

    fn flush_tail(&mut self) {
        let chunk_len = self.index.chunk_size().get();
        let mut tail = mem::take(&mut self.pending);
        tail.extend_from_slice(self.window.remaining());
        for piece in tail.chunks(chunk_len) {
            self.emit_literal(piece.to_vec());
        }
        self.state = MatchState::Done;
    }

    fn emit_literal(&mut self, data: Vec<u8>) {
        logging::trace_delta!(len = data.len(), "A");
        self.stats.literal_packets += 1;
        self.stats.literal_bytes += data.len() as u64;
        self.response.push(ResponsePacket::literal(data));
    }
}

/// Builds the response for `source` against `index` in one call.
///
/// # Errors
///
/// Propagates source I/O failures.
pub fn compute_delta<R: Read>(index: ChunkIndex, source: R) -> Result<Response, MatchError> {
    DeltaMatcher::new(index, source).run()
}
