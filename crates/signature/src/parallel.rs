//! crates/signature/src/parallel.rs
//!
//! Parallel chunk index construction using rayon.
//!
//! Chunks have no cross-chunk dependency, so the reference can be read into
//! memory and hashed concurrently. The result is identical to
//! [`build_index`]: rayon's indexed `collect` keeps chunk indices in file
//! order.

use std::io::{Read, Seek, SeekFrom};

use rayon::prelude::*;
use tracing::instrument;

use logging::trace_index;

use crate::chunk::Chunk;
use crate::chunk_size::ChunkSize;
use crate::generation::{IndexError, build_index, chunk_record};
use crate::index::ChunkIndex;

/// Minimum reference size (in bytes) where parallel hashing pays for the
/// extra buffering.
pub const PARALLEL_THRESHOLD_BYTES: u64 = 256 * 1024;

/// Builds the chunk index by reading the whole reference and hashing chunks
/// on the rayon pool.
///
/// Allocates roughly the reference length in memory. Prefer
/// [`build_index`] for memory-constrained callers.
#[instrument(skip(reader), fields(chunk_size = %chunk_size), name = "build_index_parallel")]
pub fn build_index_parallel<R: Read>(
    mut reader: R,
    chunk_size: ChunkSize,
) -> Result<ChunkIndex, IndexError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let chunks: Vec<Chunk> = data
        .par_chunks_exact(chunk_size.get())
        .enumerate()
        .map(|(index, bytes)| chunk_record(bytes, index as u64, chunk_size))
        .collect();

    trace_index!(
        chunks = chunks.len(),
        reference_bytes = data.len(),
        "built chunk index in parallel"
    );
    Ok(ChunkIndex::new(chunk_size, chunks, data.len() as u64))
}

/// Builds the chunk index, choosing the parallel path for references of at
/// least [`PARALLEL_THRESHOLD_BYTES`] measured from the current position.
pub fn build_index_auto<R: Read + Seek>(
    mut reader: R,
    chunk_size: ChunkSize,
) -> Result<ChunkIndex, IndexError> {
    let start = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(start))?;

    if end.saturating_sub(start) >= PARALLEL_THRESHOLD_BYTES {
        build_index_parallel(reader, chunk_size)
    } else {
        build_index(reader, chunk_size)
    }
}
