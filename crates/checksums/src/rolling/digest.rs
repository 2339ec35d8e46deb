use core::fmt;

use super::checksum::RollingChecksum;

/// Snapshot of a rolling checksum: the packed value together with the raw
/// accumulators and the window length that produced them.
///
/// This is the `(checksum, a_sum, b_sum)` triple returned by the initial
/// computation; the window seeds its incremental state from it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct RollingDigest {
    a_sum: u32,
    b_sum: u32,
    len: usize,
}

impl RollingDigest {
    /// Creates a digest from raw accumulators.
    #[must_use]
    pub const fn new(a_sum: u32, b_sum: u32, len: usize) -> Self {
        Self { a_sum, b_sum, len }
    }

    /// Computes the digest of `bytes` in one pass.
    ///
    /// ```
    /// use checksums::RollingDigest;
    ///
    /// let digest = RollingDigest::from_bytes(&[1, 2, 3]);
    /// assert_eq!(digest.a_sum(), 6);
    /// assert_eq!(digest.b_sum(), 3 + 2 * 2 + 1 * 3);
    /// ```
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        RollingChecksum::from_bytes(bytes).digest()
    }

    /// Raw sign-extended byte sum.
    #[inline]
    #[must_use]
    pub const fn a_sum(&self) -> u32 {
        self.a_sum
    }

    /// Raw position-weighted sum.
    #[inline]
    #[must_use]
    pub const fn b_sum(&self) -> u32 {
        self.b_sum
    }

    /// Number of bytes that contributed to the digest.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the digest covers an empty window.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed checksum, `(a & 0xffff) | (b << 16)`.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        (self.a_sum & 0xffff) | (self.b_sum << 16)
    }
}

impl From<RollingChecksum> for RollingDigest {
    fn from(checksum: RollingChecksum) -> Self {
        checksum.digest()
    }
}

impl From<&RollingChecksum> for RollingDigest {
    fn from(checksum: &RollingChecksum) -> Self {
        checksum.digest()
    }
}

impl fmt::Display for RollingDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.value())
    }
}
