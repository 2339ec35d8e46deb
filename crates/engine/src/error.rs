//! Error types for reconstruction and exchanges.

use std::io;
use std::path::{Path, PathBuf};

use batch::BatchError;
use matching::MatchError;
use signature::IndexError;
use thiserror::Error;

/// Errors raised while rebuilding a file from a response.
#[derive(Debug, Error)]
pub enum ReconstructError {
    /// A file operation failed.
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Reading the reference or writing the output stream failed.
    #[error("I/O error during reconstruction: {0}")]
    Stream(
        #[from]
        #[source]
        io::Error,
    ),
    /// A reference packet payload is not an 8-byte index.
    #[error("packet {packet}: reference payload of {len} bytes, expected 8")]
    MalformedReference {
        /// Position of the packet in the response.
        packet: usize,
        /// Payload length found.
        len: usize,
    },
    /// A reference packet names a chunk outside the chunk list.
    #[error("packet {packet}: chunk {index} out of range ({available} chunks)")]
    UnknownChunk {
        /// Position of the packet in the response.
        packet: usize,
        /// Requested chunk index.
        index: u64,
        /// Number of chunks available.
        available: usize,
    },
    /// The reference ended inside a referenced chunk.
    #[error("chunk {index} at offset {offset}: read {actual} of {expected} bytes from reference")]
    ShortChunk {
        /// Chunk index.
        index: u64,
        /// Chunk offset in the reference.
        offset: u64,
        /// Chunk size.
        expected: u64,
        /// Bytes available.
        actual: u64,
    },
}

impl ReconstructError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors raised by a whole exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// A file operation failed.
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Building the chunk index failed.
    #[error("indexing reference: {0}")]
    Index(#[from] IndexError),
    /// Scanning the source failed.
    #[error("scanning source: {0}")]
    Match(#[from] MatchError),
    /// Rebuilding the destination failed.
    #[error("reconstructing: {0}")]
    Reconstruct(#[from] ReconstructError),
    /// Reading or writing a batch file failed.
    #[error(transparent)]
    Batch(#[from] BatchError),
    /// The reference no longer matches the chunk records of a batch.
    #[error("reference chunk {index} differs from the batch record")]
    ReferenceMismatch {
        /// First chunk whose digest differs.
        index: u64,
    },
}

impl ExchangeError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_errors_name_action_and_path() {
        let err = ReconstructError::io(
            "open reference",
            Path::new("/data/ref.bin"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        let message = err.to_string();
        assert!(message.starts_with("failed to open reference '/data/ref.bin'"));
        assert!(err.source().is_some());
        assert!(matches!(err, ReconstructError::Io { .. }));
    }

    #[test]
    fn unknown_chunk_names_the_index() {
        let err = ReconstructError::UnknownChunk {
            packet: 2,
            index: 9,
            available: 3,
        };
        assert!(err.to_string().contains("chunk 9 out of range"));
    }

    #[test]
    fn exchange_error_wraps_reconstruct_error() {
        let err: ExchangeError = ReconstructError::MalformedReference { packet: 0, len: 3 }.into();
        assert!(matches!(err, ExchangeError::Reconstruct(_)));
        assert!(err.to_string().contains("3 bytes"));
    }
}
