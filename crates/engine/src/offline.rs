//! Recording a delta to a batch file and applying it elsewhere.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use batch::BatchFile;
use checksums::StrongDigest;
use rustc_hash::FxHashSet;
use signature::{Chunk, ChunkSize, read_full};
use tracing::instrument;

use crate::error::ExchangeError;
use crate::exchange::{ExchangeReport, ensure_reference, index_existing_reference, scan_source};
use crate::reconstruct::{Destination, reconstruct};

/// Computes the delta of `source` against `reference` and saves it to
/// `batch_path`.
///
/// A missing reference is treated as empty and left absent.
///
/// # Errors
///
/// Fails on I/O errors reading either input or writing the batch.
#[instrument(skip_all, fields(source = %source.display(), batch = %batch_path.display()))]
pub fn write_batch(
    source: &Path,
    reference: &Path,
    batch_path: &Path,
    chunk_size: ChunkSize,
) -> Result<ExchangeReport, ExchangeError> {
    let index = index_existing_reference(reference, chunk_size)?;

    let (response, index, stats) = scan_source(source, index)?;
    let report = ExchangeReport::from_scan(&index, &response, stats);
    BatchFile::from_index(&index, response).save(batch_path)?;
    report.log();
    Ok(report)
}

/// Rebuilds a file from the batch at `batch_path` and the local `reference`.
///
/// Every chunk the batch references is checked against its recorded digest
/// before anything is written. When rebuilding in place, a missing reference
/// is created empty first.
///
/// # Errors
///
/// Returns [`ExchangeError::ReferenceMismatch`] when the reference has
/// changed since the batch was recorded, and reconstruction errors for
/// malformed responses.
#[instrument(skip_all, fields(batch = %batch_path.display(), reference = %reference.display()))]
pub fn apply_batch(
    batch_path: &Path,
    reference: &Path,
    destination: &Destination,
) -> Result<ExchangeReport, ExchangeError> {
    let batch = BatchFile::load(batch_path)?;
    let response = batch.response();
    let created_reference = destination.is_in_place() && ensure_reference(reference)?;

    let referenced: FxHashSet<u64> = response.iter().filter_map(|p| p.chunk_index()).collect();
    if !referenced.is_empty() {
        let file = File::open(reference)
            .map_err(|error| ExchangeError::io("open reference", reference, error))?;
        verify_reference(BufReader::new(file), batch.chunks(), &referenced)
            .map_err(|error| match error {
                Verification::Read(source) => ExchangeError::io("read reference", reference, source),
                Verification::Mismatch(index) => ExchangeError::ReferenceMismatch { index },
            })?;
    }

    let mut report = ExchangeReport {
        chunk_count: batch.chunks().len(),
        packets: response.len(),
        literal_bytes: response.literal_bytes(),
        matched_bytes: response.target_len(batch.chunk_size().as_u64())
            - response.literal_bytes(),
        created_reference,
        ..ExchangeReport::default()
    };
    report.written_bytes = reconstruct(response, batch.chunks(), reference, destination)?;
    report.log();
    Ok(report)
}

#[derive(Debug)]
enum Verification {
    Read(io::Error),
    Mismatch(u64),
}

/// Confirms that each referenced chunk still hashes to its recorded digest.
///
/// Indices outside `chunks` are left for reconstruction to reject.
fn verify_reference<R: Read + Seek>(
    mut reference: R,
    chunks: &[Chunk],
    referenced: &FxHashSet<u64>,
) -> Result<(), Verification> {
    let mut ordered: Vec<u64> = referenced.iter().copied().collect();
    ordered.sort_unstable();

    let mut buffer = Vec::new();
    for index in ordered {
        let Some(chunk) = usize::try_from(index).ok().and_then(|slot| chunks.get(slot)) else {
            continue;
        };
        let len = chunk.size() as usize;
        buffer.resize(len, 0);
        reference
            .seek(SeekFrom::Start(chunk.offset()))
            .map_err(Verification::Read)?;
        let read = read_full(&mut reference, &mut buffer).map_err(Verification::Read)?;
        if read < len || StrongDigest::compute(&buffer) != *chunk.strong() {
            return Err(Verification::Mismatch(index));
        }
    }
    Ok(())
}
