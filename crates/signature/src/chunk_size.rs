//! crates/signature/src/chunk_size.rs
//!
//! Validated chunk length shared by the index, the scan window, and the
//! reconstructor.

use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use thiserror::Error;

/// Chunk length used when the caller does not choose one.
pub const DEFAULT_CHUNK_SIZE: u32 = 4096;
/// Largest accepted chunk length. The scan buffer holds four chunks and the
/// weak checksum multiplies by the window length in 32 bits.
pub const MAX_CHUNK_SIZE: u32 = 1 << 24;
/// Number of chunks held by the scan buffer.
pub const WINDOW_BUFFER_CHUNKS: usize = 4;

/// Errors produced when validating a chunk size.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ChunkSizeError {
    /// A chunk length of zero was requested.
    #[error("chunk size must be non-zero")]
    Zero,
    /// The requested length exceeds [`MAX_CHUNK_SIZE`].
    #[error("chunk size {requested} exceeds maximum of {MAX_CHUNK_SIZE} bytes")]
    TooLarge {
        /// Length that was requested.
        requested: u64,
    },
    /// A chunk size string could not be parsed as an integer.
    #[error("invalid chunk size '{0}'")]
    Parse(String),
}

/// Fixed chunk length for one exchange.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChunkSize(NonZeroU32);

impl ChunkSize {
    /// The default 4 KiB chunk.
    pub const DEFAULT: Self = match NonZeroU32::new(DEFAULT_CHUNK_SIZE) {
        Some(size) => Self(size),
        None => unreachable!(),
    };

    /// Validates `len` as a chunk length.
    ///
    /// ```
    /// use signature::ChunkSize;
    ///
    /// assert_eq!(ChunkSize::new(16).unwrap().get(), 16);
    /// assert!(ChunkSize::new(0).is_err());
    /// ```
    pub fn new(len: u64) -> Result<Self, ChunkSizeError> {
        if len > u64::from(MAX_CHUNK_SIZE) {
            return Err(ChunkSizeError::TooLarge { requested: len });
        }
        u32::try_from(len)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(ChunkSizeError::Zero)
    }

    /// Chunk length in bytes.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get() as usize
    }

    /// Chunk length as a `u32`, the width used in batch headers.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0.get()
    }

    /// Chunk length as a `u64` for offset arithmetic.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.get() as u64
    }

    /// Size of the scan buffer that amortizes source reads.
    #[inline]
    #[must_use]
    pub const fn buffer_len(self) -> usize {
        self.get() * WINDOW_BUFFER_CHUNKS
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ChunkSize {
    type Err = ChunkSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ChunkSizeError::Parse(s.to_owned()))?;
        Self::new(len)
    }
}

impl TryFrom<u32> for ChunkSize {
    type Error = ChunkSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(u64::from(value))
    }
}
