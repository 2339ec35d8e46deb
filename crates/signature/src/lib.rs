#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Reference file chunk indexing for deltasync.
//!
//! The reference file is split into fixed-size chunks. Each full chunk is
//! recorded with its weak rolling checksum, MD5 digest, offset, and index,
//! and the index groups chunk positions by weak checksum so the matcher can
//! nominate candidates in O(1).
//!
//! - [`ChunkSize`] validates the chunk length used for one exchange.
//! - [`build_index`] and [`parallel::build_index_parallel`] build a
//!   [`ChunkIndex`] from a reference stream.
//! - [`Chunk`] is the immutable per-chunk record.

mod chunk;
mod chunk_size;
mod generation;
mod index;
pub mod parallel;

pub use chunk::Chunk;
pub use chunk_size::{
    ChunkSize, ChunkSizeError, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, WINDOW_BUFFER_CHUNKS,
};
pub use generation::{IndexError, build_index, read_full};
pub use index::ChunkIndex;
