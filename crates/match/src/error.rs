//! crates/match/src/error.rs
//!
//! Error types for the delta scan.

use std::io;

use checksums::RollingError;
use thiserror::Error;

/// Errors raised while scanning a source stream.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Reading the source stream failed.
    #[error("failed to read source stream: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// The scan window no longer spans exactly one chunk.
    #[error("sliding window spans {actual} bytes, expected chunk size {expected}")]
    WindowSize {
        /// Configured chunk size.
        expected: usize,
        /// Observed window length.
        actual: usize,
    },
    /// The rolling checksum rejected an update.
    #[error(transparent)]
    Rolling(#[from] RollingError),
    /// [`DeltaMatcher::run`](crate::DeltaMatcher::run) was called after the
    /// scan had already completed.
    #[error("delta scan already finished")]
    Finished,
}
