//! crates/signature/src/chunk.rs
//!
//! Individual reference chunk record.

use checksums::StrongDigest;

/// Describes one fixed-size chunk of the reference file.
///
/// Records are created once while the index is built and never change. The
/// `index` is the chunk's position in the chunk list and is the only value a
/// B-block carries to reference it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Chunk {
    weak: u32,
    strong: StrongDigest,
    offset: u64,
    size: u64,
    index: u64,
}

impl Chunk {
    pub(crate) const fn new(
        weak: u32,
        strong: StrongDigest,
        offset: u64,
        size: u64,
        index: u64,
    ) -> Self {
        Self {
            weak,
            strong,
            offset,
            size,
            index,
        }
    }

    /// Creates a chunk record from raw components (for batch decoding).
    #[must_use]
    pub const fn from_raw_parts(
        weak: u32,
        strong: StrongDigest,
        offset: u64,
        size: u64,
        index: u64,
    ) -> Self {
        Self::new(weak, strong, offset, size, index)
    }

    /// Packed weak checksum of the chunk.
    #[inline]
    #[must_use]
    pub const fn weak(&self) -> u32 {
        self.weak
    }

    /// MD5 digest of the chunk.
    #[inline]
    #[must_use]
    pub const fn strong(&self) -> &StrongDigest {
        &self.strong
    }

    /// Byte offset of the chunk in the reference file.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes covered by the chunk.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Zero-based position of the chunk in the chunk list.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_parts_exposes_fields() {
        let strong = StrongDigest::compute(b"chunk");
        let chunk = Chunk::from_raw_parts(7, strong, 4096, 4096, 1);
        assert_eq!(chunk.weak(), 7);
        assert_eq!(chunk.strong(), &strong);
        assert_eq!(chunk.offset(), 4096);
        assert_eq!(chunk.size(), 4096);
        assert_eq!(chunk.index(), 1);
    }
}
