//! Local exchange: index the reference, scan the source, rebuild the
//! destination.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use matching::{DeltaMatcher, MatchStats, Response};
use signature::parallel::build_index_auto;
use signature::{ChunkIndex, ChunkSize, build_index};
use tracing::instrument;

use crate::error::ExchangeError;
use crate::reconstruct::{Destination, reconstruct};

/// Settings for one exchange.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExchangeOptions {
    chunk_size: ChunkSize,
    destination: Destination,
}

impl ExchangeOptions {
    /// Default options: 4096-byte chunks, reconstructing in place.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Writes the result to `output` instead of replacing the reference.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.destination = Destination::Output(output.into());
        self
    }

    /// Chunk size used for the index and the scan.
    #[must_use]
    pub const fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Where the result is written.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }
}

/// Summary of a completed exchange.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExchangeReport {
    /// Full chunks in the reference index.
    pub chunk_count: usize,
    /// Packets in the response.
    pub packets: usize,
    /// Bytes sent as literals.
    pub literal_bytes: u64,
    /// Bytes covered by reference chunks.
    pub matched_bytes: u64,
    /// Weak checksum hits rejected by the strong digest.
    pub integrity_warnings: u64,
    /// Bytes written to the destination.
    pub written_bytes: u64,
    /// Whether a missing reference was created empty.
    pub created_reference: bool,
}

impl ExchangeReport {
    pub(crate) fn from_scan(index: &ChunkIndex, response: &Response, stats: MatchStats) -> Self {
        Self {
            chunk_count: index.len(),
            packets: response.len(),
            literal_bytes: stats.literal_bytes,
            matched_bytes: stats.matched_bytes,
            integrity_warnings: stats.integrity_warnings,
            ..Self::default()
        }
    }

    pub(crate) fn log(&self) {
        logging::trace_stats!(
            chunks = self.chunk_count,
            packets = self.packets,
            literal_bytes = self.literal_bytes,
            matched_bytes = self.matched_bytes,
            integrity_warnings = self.integrity_warnings,
            written_bytes = self.written_bytes,
            "exchange complete"
        );
    }
}

/// Synchronises `reference` (or the configured output) with `source`.
///
/// A missing reference is treated as empty, so every source byte is sent as
/// a literal. It is created first when rebuilding in place and left absent
/// when an output path is configured. The source may be the reference itself; it is read in full
/// before the result is renamed into place.
///
/// # Errors
///
/// Returns the first failure from indexing, scanning, or reconstruction.
#[instrument(skip_all, fields(source = %source.display(), reference = %reference.display()))]
pub fn sync_files(
    source: &Path,
    reference: &Path,
    options: &ExchangeOptions,
) -> Result<ExchangeReport, ExchangeError> {
    let created_reference = options.destination().is_in_place() && ensure_reference(reference)?;
    let index = index_existing_reference(reference, options.chunk_size())?;

    let (response, index, stats) = scan_source(source, index)?;
    let mut report = ExchangeReport::from_scan(&index, &response, stats);
    report.created_reference = created_reference;

    report.written_bytes = reconstruct(
        &response,
        index.chunks(),
        reference,
        options.destination(),
    )?;
    report.log();
    Ok(report)
}

/// Creates an empty reference, and its parent directories, if none exists.
pub(crate) fn ensure_reference(reference: &Path) -> Result<bool, ExchangeError> {
    match fs::metadata(reference) {
        Ok(_) => Ok(false),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = reference
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
            {
                fs::create_dir_all(parent)
                    .map_err(|error| ExchangeError::io("create directory", parent, error))?;
            }
            File::create(reference)
                .map_err(|error| ExchangeError::io("create reference", reference, error))?;
            logging::trace_recv!(reference = %reference.display(), "created empty reference");
            Ok(true)
        }
        Err(error) => Err(ExchangeError::io("stat reference", reference, error)),
    }
}

pub(crate) fn index_reference(
    reference: &Path,
    chunk_size: ChunkSize,
) -> Result<ChunkIndex, ExchangeError> {
    let file = File::open(reference)
        .map_err(|error| ExchangeError::io("open reference", reference, error))?;
    let index = build_index_auto(file, chunk_size)?;
    logging::trace_index!(
        reference = %reference.display(),
        reference_len = index.reference_len(),
        dropped_tail = index.dropped_tail_len(),
        "indexed reference"
    );
    Ok(index)
}

/// Indexes `reference`, or an empty stream when it does not exist.
pub(crate) fn index_existing_reference(
    reference: &Path,
    chunk_size: ChunkSize,
) -> Result<ChunkIndex, ExchangeError> {
    if reference.exists() {
        index_reference(reference, chunk_size)
    } else {
        Ok(build_index(io::empty(), chunk_size)?)
    }
}

pub(crate) fn scan_source(
    source: &Path,
    index: ChunkIndex,
) -> Result<(Response, ChunkIndex, MatchStats), ExchangeError> {
    let file =
        File::open(source).map_err(|error| ExchangeError::io("open source", source, error))?;
    let mut matcher = DeltaMatcher::new(index, BufReader::new(file));
    let response = matcher.run()?;
    let stats = matcher.stats();
    Ok((response, matcher.into_index(), stats))
}
