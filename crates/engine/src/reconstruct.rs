//! Rebuilding a file from a [`Response`] and the reference it was computed
//! against.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use matching::{BlockType, Response};
use signature::{Chunk, read_full};

use crate::error::ReconstructError;
use crate::guard::DestinationWriteGuard;

/// Where reconstructed bytes go.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Destination {
    /// Replace the reference itself once reconstruction succeeds.
    #[default]
    InPlace,
    /// Write to a separate path, leaving the reference untouched.
    Output(PathBuf),
}

impl Destination {
    /// Path that will hold the result for a given reference.
    #[must_use]
    pub fn resolve<'a>(&'a self, reference: &'a Path) -> &'a Path {
        match self {
            Self::InPlace => reference,
            Self::Output(path) => path,
        }
    }

    /// Whether the result replaces the reference.
    #[must_use]
    pub fn is_in_place(&self) -> bool {
        matches!(self, Self::InPlace)
    }
}

/// Writes the file described by `response` into `writer`.
///
/// Literal packets are copied verbatim; reference packets copy their chunk
/// from `reference`. Returns the number of bytes written.
///
/// # Errors
///
/// Protocol errors are returned for reference payloads that are not 8 bytes,
/// chunk indices outside `chunks`, and chunks the reference cannot supply in
/// full. I/O failures are returned as [`ReconstructError::Stream`].
pub fn reconstruct_to_writer<R, W>(
    response: &Response,
    chunks: &[Chunk],
    mut reference: R,
    mut writer: W,
) -> Result<u64, ReconstructError>
where
    R: Read + Seek,
    W: Write,
{
    let mut buffer = Vec::new();
    let mut position: Option<u64> = None;
    let mut written = 0u64;

    for (packet_index, packet) in response.iter().enumerate() {
        if packet.block_type() == BlockType::Literal {
            writer.write_all(packet.data())?;
            written += packet.data().len() as u64;
            continue;
        }

        let index = packet
            .chunk_index()
            .ok_or(ReconstructError::MalformedReference {
                packet: packet_index,
                len: packet.data().len(),
            })?;
        let chunk = usize::try_from(index)
            .ok()
            .and_then(|slot| chunks.get(slot))
            .ok_or(ReconstructError::UnknownChunk {
                packet: packet_index,
                index,
                available: chunks.len(),
            })?;

        if position != Some(chunk.offset()) {
            reference.seek(SeekFrom::Start(chunk.offset()))?;
        }
        let len = chunk.size() as usize;
        if buffer.len() < len {
            buffer.resize(len, 0);
        }
        let read = read_full(&mut reference, &mut buffer[..len])?;
        if read < len {
            return Err(ReconstructError::ShortChunk {
                index,
                offset: chunk.offset(),
                expected: chunk.size(),
                actual: read as u64,
            });
        }
        position = Some(chunk.offset() + chunk.size());

        writer.write_all(&buffer[..len])?;
        written += chunk.size();
    }

    writer.flush()?;
    logging::trace_recv!(packets = response.len(), written, "reconstructed");
    Ok(written)
}

/// Rebuilds the file described by `response` from the reference at
/// `reference`.
///
/// Output is staged in a temporary sibling of the destination, flushed and
/// synced, then renamed into place, so the destination is either the old
/// file or the complete new one. The staging file is removed on failure.
///
/// # Errors
///
/// See [`reconstruct_to_writer`]; file operations add
/// [`ReconstructError::Io`] with the path involved.
pub fn reconstruct(
    response: &Response,
    chunks: &[Chunk],
    reference: &Path,
    destination: &Destination,
) -> Result<u64, ReconstructError> {
    let target = destination.resolve(reference);
    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|error| ReconstructError::io("create directory", parent, error))?;
    }

    // An all-literal response never reads the reference, which may not exist.
    let reference_file = if response.reference_count() > 0 {
        let file = File::open(reference)
            .map_err(|error| ReconstructError::io("open reference", reference, error))?;
        Some(BufReader::new(file))
    } else {
        None
    };
    let (guard, file) = DestinationWriteGuard::new(target)?;
    let mut writer = BufWriter::new(file);

    let written = match reference_file {
        Some(reader) => reconstruct_to_writer(response, chunks, reader, &mut writer)?,
        None => reconstruct_to_writer(response, chunks, io::empty(), &mut writer)?,
    };

    let file = writer.into_inner().map_err(|error| {
        ReconstructError::io("flush staging file", guard.staging_path(), error.into_error())
    })?;
    file.sync_all()
        .map_err(|error| ReconstructError::io("sync staging file", guard.staging_path(), error))?;
    drop(file);
    guard.commit()?;

    logging::trace_recv!(
        target = %target.display(),
        in_place = destination.is_in_place(),
        written,
        "committed"
    );
    Ok(written)
}
