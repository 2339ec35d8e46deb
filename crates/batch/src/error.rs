//! crates/batch/src/error.rs
//!
//! Error types for batch operations.

use std::io;
use std::path::PathBuf;

use signature::ChunkSizeError;
use thiserror::Error;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur while encoding or decoding batch data.
#[derive(Debug, Error)]
pub enum BatchError {
    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Opening or creating a batch file failed.
    #[error("failed to {action} batch file '{}': {source}", path.display())]
    File {
        /// What was being attempted.
        action: &'static str,
        /// Batch file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The stream does not start with the batch magic.
    #[error("Invalid batch format: bad magic {found:02x?}")]
    BadMagic {
        /// Bytes found where the magic was expected.
        found: [u8; 8],
    },
    /// The header carries an unusable chunk size.
    #[error("Invalid batch format: {0}")]
    ChunkSize(#[from] ChunkSizeError),
    /// A packet tag is neither `A` (0) nor `B` (1).
    #[error("Invalid batch format: unknown block type {tag}")]
    UnknownBlockType {
        /// Tag read from the stream.
        tag: u8,
    },
    /// A literal packet is larger than one chunk.
    #[error("Invalid batch format: literal of {len} bytes exceeds chunk size {chunk_size}")]
    OversizeLiteral {
        /// Declared payload length.
        len: u32,
        /// Chunk size from the header.
        chunk_size: u32,
    },
    /// A reference packet payload is not 8 bytes.
    #[error("Invalid batch format: reference payload of {len} bytes, expected 8")]
    ReferenceWidth {
        /// Declared payload length.
        len: u32,
    },
    /// A decoded chunk record does not match its position or the chunk size.
    #[error("Invalid batch format: chunk record {position} is inconsistent")]
    InconsistentChunk {
        /// Position of the record in the list.
        position: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::ErrorKind;

    #[test]
    fn io_error_from_std_io_error() {
        let batch_err: BatchError = io::Error::new(ErrorKind::UnexpectedEof, "short").into();
        assert!(matches!(batch_err, BatchError::Io(_)));
        assert!(batch_err.to_string().contains("I/O error"));
        assert!(batch_err.source().is_some());
    }

    #[test]
    fn file_error_names_path() {
        let err = BatchError::File {
            action: "open",
            path: PathBuf::from("/tmp/x.batch"),
            source: io::Error::from(ErrorKind::NotFound),
        };
        let message = err.to_string();
        assert!(message.contains("open"));
        assert!(message.contains("/tmp/x.batch"));
    }

    #[test]
    fn format_errors_are_labelled() {
        let err = BatchError::UnknownBlockType { tag: 7 };
        assert!(err.to_string().contains("Invalid batch format"));
        assert!(err.to_string().contains('7'));

        let err = BatchError::BadMagic { found: *b"NOTBATCH" };
        assert!(err.to_string().starts_with("Invalid batch format"));
    }
}
