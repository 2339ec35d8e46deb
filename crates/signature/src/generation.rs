//! crates/signature/src/generation.rs
//!
//! Chunk index construction from a reference stream.

use std::io::{self, Read};

use thiserror::Error;
use tracing::instrument;

use checksums::{RollingChecksum, StrongDigest};
use logging::trace_index;

use crate::chunk::Chunk;
use crate::chunk_size::{ChunkSize, ChunkSizeError};
use crate::index::ChunkIndex;

/// Errors returned when building a chunk index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Underlying I/O failure raised while reading the reference file.
    #[error("failed to read reference while building chunk index: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// The chunk size configuration was invalid.
    #[error(transparent)]
    ChunkSize(#[from] ChunkSizeError),
}

/// Reads until `buffer` is full or the stream ends, returning the number of
/// bytes read. Interrupted reads are retried.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Hashes one full chunk into its record.
pub(crate) fn chunk_record(data: &[u8], index: u64, chunk_size: ChunkSize) -> Chunk {
    let weak = RollingChecksum::from_bytes(data).value();
    let strong = StrongDigest::compute(data);
    Chunk::new(
        weak,
        strong,
        index * chunk_size.as_u64(),
        chunk_size.as_u64(),
        index,
    )
}

/// Builds the chunk index of a reference stream.
///
/// The stream is read in `chunk_size` pieces; each full piece becomes a
/// [`Chunk`] with its weak checksum, MD5 digest, offset, and index. A trailing
/// piece shorter than `chunk_size` is not indexed and can never be referenced.
///
/// ```
/// use signature::{ChunkSize, build_index};
///
/// let data = b"0123456789";
/// let index = build_index(&data[..], ChunkSize::new(4).unwrap()).unwrap();
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.dropped_tail_len(), 2);
/// ```
///
/// # Errors
///
/// Propagates any I/O error surfaced by the reader.
#[instrument(skip(reader), fields(chunk_size = %chunk_size), name = "build_index")]
pub fn build_index<R: Read>(mut reader: R, chunk_size: ChunkSize) -> Result<ChunkIndex, IndexError> {
    let mut chunks = Vec::new();
    let mut buffer = vec![0u8; chunk_size.get()];
    let mut total_bytes: u64 = 0;

    loop {
        let n = read_full(&mut reader, &mut buffer)?;
        total_bytes += n as u64;
        if n < buffer.len() {
            if n > 0 {
                trace_index!(tail = n, "dropping partial trailing chunk");
            }
            break;
        }
        let index = chunks.len() as u64;
        chunks.push(chunk_record(&buffer, index, chunk_size));
    }

    trace_index!(
        chunks = chunks.len(),
        reference_bytes = total_bytes,
        "built chunk index"
    );
    Ok(ChunkIndex::new(chunk_size, chunks, total_bytes))
}
