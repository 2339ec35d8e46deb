//! crates/batch/src/file.rs
//!
//! Whole batch files: header, reference chunk list and response.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use matching::Response;
use signature::{Chunk, ChunkIndex, ChunkSize};

use crate::codec::{read_chunk_list, read_header, read_response, write_chunk_list, write_header, write_response};
use crate::error::{BatchError, BatchResult};

/// A recorded delta: everything a receiver holding the reference needs to
/// rebuild the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchFile {
    chunk_size: ChunkSize,
    chunks: Vec<Chunk>,
    response: Response,
}

impl BatchFile {
    /// Creates a batch from its parts.
    #[must_use]
    pub const fn new(chunk_size: ChunkSize, chunks: Vec<Chunk>, response: Response) -> Self {
        Self {
            chunk_size,
            chunks,
            response,
        }
    }

    /// Creates a batch from the index the response was computed against.
    #[must_use]
    pub fn from_index(index: &ChunkIndex, response: Response) -> Self {
        Self::new(index.chunk_size(), index.chunks().to_vec(), response)
    }

    /// Chunk size the batch was recorded with.
    #[must_use]
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Reference chunk records.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Recorded response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Encodes the batch into `writer`.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> BatchResult<()> {
        write_header(writer, self.chunk_size)?;
        write_chunk_list(writer, &self.chunks)?;
        write_response(writer, &self.response)?;
        Ok(())
    }

    /// Decodes a batch from `reader`.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> BatchResult<Self> {
        let chunk_size = read_header(reader)?;
        let chunks = read_chunk_list(reader, chunk_size)?;
        let response = read_response(reader, chunk_size)?;
        Ok(Self::new(chunk_size, chunks, response))
    }

    /// Writes the batch to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> BatchResult<()> {
        let file = File::create(path).map_err(|source| BatchError::File {
            action: "create",
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        logging::trace_batch!(
            path = %path.display(),
            chunks = self.chunks.len(),
            packets = self.response.len(),
            "wrote batch"
        );
        Ok(())
    }

    /// Reads a batch from `path`.
    pub fn load(path: &Path) -> BatchResult<Self> {
        let file = File::open(path).map_err(|source| BatchError::File {
            action: "open",
            path: path.to_path_buf(),
            source,
        })?;
        let batch = Self::read_from(&mut BufReader::new(file))?;
        logging::trace_batch!(
            path = %path.display(),
            chunk_size = batch.chunk_size.get(),
            packets = batch.response.len(),
            "read batch"
        );
        Ok(batch)
    }
}
