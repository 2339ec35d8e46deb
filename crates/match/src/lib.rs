#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `matching` scans a source stream against a [`signature::ChunkIndex`] and
//! describes the source as a [`Response`]: literal (`A`) packets for bytes
//! without a reference counterpart and reference (`B`) packets naming chunks
//! the receiver already holds.
//!
//! # Design
//!
//! - [`SlidingWindow`] owns a buffer of four chunks and the rolling weak
//!   checksum of its current window.
//! - [`DeltaMatcher`] drives the window through the
//!   [`MatchState`] machine, confirming weak hits with the strong digest and
//!   consuming matched chunks so each is referenced at most once.
//!
//! # Examples
//!
//! ```
//! use matching::compute_delta;
//! use signature::{ChunkSize, build_index};
//!
//! let reference = b"0123456789abcdef";
//! let index = build_index(&reference[..], ChunkSize::new(8)?)?;
//! let response = compute_delta(index, &b"89abcdef01234567"[..])?;
//!
//! let indices: Vec<_> = response.iter().filter_map(|p| p.chunk_index()).collect();
//! assert_eq!(indices, vec![1, 0]);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

mod error;
mod matcher;
mod response;
mod window;

pub use error::MatchError;
pub use matcher::{DeltaMatcher, MatchState, MatchStats, compute_delta};
pub use response::{BlockType, REFERENCE_PAYLOAD_LEN, Response, ResponsePacket};
pub use window::{Advance, SlidingWindow};
