#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Checksums used by the deltasync chunk matcher.
//!
//! - [`RollingChecksum`] is the weak, incrementally rollable checksum used as
//!   a first-pass filter when scanning a source file.
//! - [`strong`] provides the 16-byte MD5 digest that confirms a weak hit
//!   before a chunk is reused.
//!
//! Both the chunk index and the sliding window compute the weak checksum
//! through the same type, so any byte-identical chunk-sized region is
//! discoverable by checksum lookup.

mod rolling;
pub mod strong;

pub use rolling::{RollingChecksum, RollingDigest, RollingError, sign_extend};
pub use strong::{STRONG_DIGEST_LEN, StrongDigest, StrongHasher};
