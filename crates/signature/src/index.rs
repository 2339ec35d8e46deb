//! crates/signature/src/index.rs
//!
//! Chunk list plus the weak-checksum candidate map consulted by the matcher.

use rustc_hash::FxHashMap;

use crate::chunk::Chunk;
use crate::chunk_size::ChunkSize;

/// Chunk table of a reference file together with its candidate lookup.
///
/// The chunk list is an arena in file order; the candidate map stores
/// positions into it, grouped by weak checksum in insertion order. Consuming
/// a candidate removes it from its group but keeps the [`Chunk`] record, so
/// B-blocks emitted earlier stay resolvable for the whole exchange.
#[derive(Clone, Debug)]
pub struct ChunkIndex {
    chunk_size: ChunkSize,
    chunks: Vec<Chunk>,
    candidates: FxHashMap<u32, Vec<usize>>,
    reference_len: u64,
}

impl ChunkIndex {
    pub(crate) fn new(chunk_size: ChunkSize, chunks: Vec<Chunk>, reference_len: u64) -> Self {
        let mut candidates: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        for (position, chunk) in chunks.iter().enumerate() {
            candidates.entry(chunk.weak()).or_default().push(position);
        }
        Self {
            chunk_size,
            chunks,
            candidates,
            reference_len,
        }
    }

    /// Chunk length this index was built with.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// All indexed chunks in file order.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Looks up a chunk by its transmitted index.
    #[must_use]
    pub fn chunk(&self, index: u64) -> Option<&Chunk> {
        usize::try_from(index).ok().and_then(|i| self.chunks.get(i))
    }

    /// Number of indexed chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Reports whether no chunk was indexed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of reference bytes consumed while building the index.
    #[inline]
    #[must_use]
    pub const fn reference_len(&self) -> u64 {
        self.reference_len
    }

    /// Length of the trailing partial chunk that was left out of the index.
    #[must_use]
    pub fn dropped_tail_len(&self) -> u64 {
        self.reference_len % self.chunk_size.as_u64()
    }

    /// Unconsumed candidate positions for `weak`, in chunk insertion order.
    #[must_use]
    pub fn candidates(&self, weak: u32) -> &[usize] {
        self.candidates.get(&weak).map_or(&[], Vec::as_slice)
    }

    /// Removes the candidate at `slot` of the `weak` group and returns the
    /// consumed chunk.
    ///
    /// Removal keeps the remaining candidates in insertion order. Groups are
    /// dropped once empty.
    pub fn consume(&mut self, weak: u32, slot: usize) -> Option<&Chunk> {
        let group = self.candidates.get_mut(&weak)?;
        if slot >= group.len() {
            return None;
        }
        let position = group.remove(slot);
        if group.is_empty() {
            self.candidates.remove(&weak);
        }
        self.chunks.get(position)
    }

    /// Total number of candidates that can still be matched.
    #[must_use]
    pub fn remaining_candidates(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::build_index;

    fn size(len: u64) -> ChunkSize {
        ChunkSize::new(len).expect("chunk size")
    }

    #[test]
    fn duplicate_chunks_share_one_group_in_file_order() {
        let data = b"abcdabcdwxyzabcd";
        let index = build_index(&data[..], size(4)).expect("index");
        let weak = index.chunks()[0].weak();
        assert_eq!(index.candidates(weak), &[0, 1, 3]);
    }

    #[test]
    fn consume_removes_only_the_selected_candidate() {
        let data = b"abcdabcdabcd";
        let mut index = build_index(&data[..], size(4)).expect("index");
        let weak = index.chunks()[0].weak();

        let consumed = index.consume(weak, 1).copied().expect("consumed");
        assert_eq!(consumed.index(), 1);
        assert_eq!(index.candidates(weak), &[0, 2]);
        assert_eq!(index.len(), 3, "chunk records are never removed");

        index.consume(weak, 0);
        index.consume(weak, 0);
        assert!(index.candidates(weak).is_empty());
        assert!(index.consume(weak, 0).is_none());
        assert_eq!(index.remaining_candidates(), 0);
    }

    #[test]
    fn chunk_lookup_rejects_out_of_range() {
        let index = build_index(&b"abcd"[..], size(4)).expect("index");
        assert!(index.chunk(0).is_some());
        assert!(index.chunk(1).is_none());
        assert!(index.chunk(u64::MAX).is_none());
    }
}
