use super::digest::RollingDigest;
use super::error::RollingError;

/// Widens a byte as a two's-complement `i8`, so values 128–255 contribute
/// negatively to both accumulators.
#[inline]
#[must_use]
pub const fn sign_extend(byte: u8) -> u32 {
    byte as i8 as i32 as u32
}

/// Weak rolling checksum over a fixed-size window.
///
/// `a` accumulates the sign-extended byte sum and `b` the position-weighted
/// sum, both as wrapping 32-bit values. The packed [`value`](Self::value) keeps
/// the low 16 bits of `a` and the low 16 bits of `b` in the upper half.
#[doc(alias = "adler")]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RollingChecksum {
    a: u32,
    b: u32,
    len: usize,
}

impl RollingChecksum {
    /// Creates a new rolling checksum with zeroed state.
    ///
    /// # Examples
    ///
    /// ```
    /// use checksums::RollingChecksum;
    ///
    /// let checksum = RollingChecksum::new();
    /// assert!(checksum.is_empty());
    /// assert_eq!(checksum.value(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { a: 0, b: 0, len: 0 }
    }

    /// Computes the checksum of `bytes` from scratch.
    ///
    /// This is the O(n) initial computation used once per indexed chunk and
    /// whenever the scan window jumps by a whole chunk.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut checksum = Self::new();
        checksum.update(bytes);
        checksum
    }

    /// Reconstructs a rolling checksum from a previously captured digest.
    #[must_use]
    pub const fn from_digest(digest: RollingDigest) -> Self {
        Self {
            a: digest.a_sum(),
            b: digest.b_sum(),
            len: digest.len(),
        }
    }

    /// Resets the checksum back to its initial state.
    pub const fn reset(&mut self) {
        self.a = 0;
        self.b = 0;
        self.len = 0;
    }

    /// Returns the number of bytes in the window.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes have been observed yet.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `chunk` to the window.
    ///
    /// Every byte already in the window gains one unit of weight, which is
    /// why `b` absorbs the running `a` after each byte.
    ///
    /// ```
    /// use checksums::RollingChecksum;
    ///
    /// let mut checksum = RollingChecksum::new();
    /// checksum.update(b"Hello, ");
    /// checksum.update(b"delta!");
    /// assert_eq!(checksum.value(), RollingChecksum::from_bytes(b"Hello, delta!").value());
    /// ```
    #[inline]
    pub fn update(&mut self, chunk: &[u8]) {
        let mut a = self.a;
        let mut b = self.b;
        for &byte in chunk {
            a = a.wrapping_add(sign_extend(byte));
            b = b.wrapping_add(a);
        }
        self.a = a;
        self.b = b;
        self.len += chunk.len();
    }

    /// Clears the state and computes the checksum of `block`.
    pub fn update_from_block(&mut self, block: &[u8]) {
        self.reset();
        self.update(block);
    }

    #[inline]
    fn window_len_u32(&self) -> Result<u32, RollingError> {
        if self.len == 0 {
            return Err(RollingError::EmptyWindow);
        }
        u32::try_from(self.len).map_err(|_| RollingError::WindowTooLarge { len: self.len })
    }

    /// Slides the window one byte forward: `outgoing` leaves on the left and
    /// `incoming` enters on the right. The window length is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::EmptyWindow`] if no bytes have been processed,
    /// or [`RollingError::WindowTooLarge`] when the window length does not fit
    /// the 32-bit weight multiplier.
    #[inline]
    pub fn roll(&mut self, outgoing: u8, incoming: u8) -> Result<(), RollingError> {
        let window_len = self.window_len_u32()?;
        let out = sign_extend(outgoing);

        let a = self.a.wrapping_sub(out).wrapping_add(sign_extend(incoming));
        let b = self.b.wrapping_sub(window_len.wrapping_mul(out)).wrapping_add(a);

        self.a = a;
        self.b = b;
        Ok(())
    }

    /// Returns the packed 32-bit checksum used for candidate lookups.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        (self.a & 0xffff) | (self.b << 16)
    }

    /// Returns the raw `a` accumulator.
    #[inline]
    #[must_use]
    pub const fn a_sum(&self) -> u32 {
        self.a
    }

    /// Returns the raw `b` accumulator.
    #[inline]
    #[must_use]
    pub const fn b_sum(&self) -> u32 {
        self.b
    }

    /// Captures the current state as a [`RollingDigest`].
    #[inline]
    #[must_use]
    pub const fn digest(&self) -> RollingDigest {
        RollingDigest::new(self.a, self.b, self.len)
    }
}

impl From<RollingDigest> for RollingChecksum {
    fn from(digest: RollingDigest) -> Self {
        Self::from_digest(digest)
    }
}
