//! Strong checksum used to confirm weak checksum candidates.
//!
//! A weak checksum hit only nominates a chunk; reuse requires the full-window
//! MD5 digests to be equal. The digest is stored inline as a fixed 16-byte
//! array so chunk records stay `Copy`-sized and comparisons never allocate.

use core::fmt;

use digest::Digest;
use md5::Md5;

/// Width in bytes of the strong digest.
pub const STRONG_DIGEST_LEN: usize = 16;

/// 16-byte MD5 digest of a chunk or window.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct StrongDigest([u8; STRONG_DIGEST_LEN]);

impl StrongDigest {
    /// Hashes `data` in one shot.
    ///
    /// ```
    /// use checksums::StrongDigest;
    ///
    /// let digest = StrongDigest::compute(b"abc");
    /// assert_eq!(digest.to_string(), "900150983cd24fb0d6963f7d28e17f72");
    /// ```
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = StrongHasher::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Wraps raw digest bytes, e.g. when decoding a chunk record.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; STRONG_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the digest bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; STRONG_DIGEST_LEN] {
        &self.0
    }

}

impl AsRef<[u8]> for StrongDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for StrongDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Streaming MD5 hasher producing a [`StrongDigest`].
#[derive(Clone, Default)]
pub struct StrongHasher {
    inner: Md5,
}

impl StrongHasher {
    /// Creates a hasher with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Md5::new() }
    }

    /// Feeds additional bytes into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalises the digest.
    #[must_use]
    pub fn finalize(self) -> StrongDigest {
        StrongDigest(self.inner.finalize().into())
    }
}

impl fmt::Debug for StrongHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrongHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_rfc1321() {
        assert_eq!(
            StrongDigest::compute(b"").to_string(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = StrongHasher::new();
        hasher.update(b"The quick brown fox ");
        hasher.update(b"jumps over the lazy dog");
        assert_eq!(
            hasher.finalize(),
            StrongDigest::compute(b"The quick brown fox jumps over the lazy dog")
        );
    }

    #[test]
    fn from_bytes_round_trips() {
        let digest = StrongDigest::compute(b"chunk");
        assert_eq!(StrongDigest::from_bytes(*digest.as_bytes()), digest);
    }
}
