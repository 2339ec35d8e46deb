//! Rolling checksum implementation for deltasync delta scans.
//!
//! The rolling checksum is a weak but fast checksum used to identify candidate
//! chunks while the source file is scanned. Sliding the window by one byte
//! costs O(1) instead of a full recomputation.
//!
//! # Algorithm
//!
//! Two accumulators are kept over the window `x_0 .. x_{n-1}`:
//!
//! ```text
//! a = Σ sx(x_i)
//! b = Σ (n - i) * sx(x_i)
//! checksum = (a & 0xffff) | (b << 16)
//! ```
//!
//! where `sx` sign-extends the byte as a two's-complement `i8`. All arithmetic
//! is wrapping 32-bit. The signed interpretation changes which byte sequences
//! collide, so it is part of the checksum definition and must not be replaced
//! with the unsigned form.
//!
//! # Example
//!
//! ```rust
//! use checksums::RollingChecksum;
//!
//! let mut rolling = RollingChecksum::new();
//! rolling.update(b"hello");
//!
//! // Slide window: remove 'h', add '!'
//! rolling.roll(b'h', b'!').unwrap();
//! assert_eq!(rolling.value(), RollingChecksum::from_bytes(b"ello!").value());
//! ```

mod checksum;
mod digest;
mod error;

pub use checksum::{RollingChecksum, sign_extend};
pub use digest::RollingDigest;
pub use error::RollingError;

#[cfg(test)]
mod tests;
