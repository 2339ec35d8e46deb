//! crates/batch/src/codec.rs
//!
//! Encoding of the batch header, chunk records and response packets.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header   = magic[8] chunk_size:u32
//! chunks   = count:u64 { weak:u32 strong[16] offset:u64 size:u64 index:u64 }*
//! response = count:u64 { block_type:u8 len:u32 payload[len] }*
//! ```

use std::io::{Read, Write};

use checksums::StrongDigest;
use matching::{BlockType, REFERENCE_PAYLOAD_LEN, Response, ResponsePacket};
use signature::{Chunk, ChunkSize};

use crate::error::{BatchError, BatchResult};
use crate::wire::{read_array, read_payload, read_u8, read_u32, read_u64, write_u8, write_u32, write_u64};

/// Magic bytes opening every batch stream.
pub const BATCH_MAGIC: [u8; 8] = *b"DSYNCB01";

/// Encoded size of one chunk record.
pub const CHUNK_RECORD_LEN: usize = 4 + 16 + 8 + 8 + 8;

/// Writes the magic and chunk size.
pub fn write_header<W: Write + ?Sized>(writer: &mut W, chunk_size: ChunkSize) -> BatchResult<()> {
    writer.write_all(&BATCH_MAGIC)?;
    write_u32(writer, chunk_size.as_u32())?;
    Ok(())
}

/// Reads and validates the magic and chunk size.
pub fn read_header<R: Read + ?Sized>(reader: &mut R) -> BatchResult<ChunkSize> {
    let found: [u8; 8] = read_array(reader)?;
    if found != BATCH_MAGIC {
        return Err(BatchError::BadMagic { found });
    }
    Ok(ChunkSize::try_from(read_u32(reader)?)?)
}

/// Writes one chunk record.
pub fn write_chunk<W: Write + ?Sized>(writer: &mut W, chunk: &Chunk) -> BatchResult<()> {
    write_u32(writer, chunk.weak())?;
    writer.write_all(chunk.strong().as_bytes())?;
    write_u64(writer, chunk.offset())?;
    write_u64(writer, chunk.size())?;
    write_u64(writer, chunk.index())?;
    Ok(())
}

/// Reads one chunk record.
pub fn read_chunk<R: Read + ?Sized>(reader: &mut R) -> BatchResult<Chunk> {
    let weak = read_u32(reader)?;
    let strong = StrongDigest::from_bytes(read_array(reader)?);
    let offset = read_u64(reader)?;
    let size = read_u64(reader)?;
    let index = read_u64(reader)?;
    Ok(Chunk::from_raw_parts(weak, strong, offset, size, index))
}

/// Writes a counted chunk list.
pub fn write_chunk_list<W: Write + ?Sized>(writer: &mut W, chunks: &[Chunk]) -> BatchResult<()> {
    write_u64(writer, chunks.len() as u64)?;
    for chunk in chunks {
        write_chunk(writer, chunk)?;
    }
    Ok(())
}

/// Reads a counted chunk list, checking that every record sits at its own
/// index and spans `chunk_size` bytes.
pub fn read_chunk_list<R: Read + ?Sized>(
    reader: &mut R,
    chunk_size: ChunkSize,
) -> BatchResult<Vec<Chunk>> {
    let count = read_u64(reader)?;
    let mut chunks = Vec::with_capacity(count.min(4096) as usize);
    for position in 0..count {
        let chunk = read_chunk(reader)?;
        if chunk.index() != position
            || chunk.size() != chunk_size.as_u64()
            || chunk.offset() != position.saturating_mul(chunk_size.as_u64())
        {
            return Err(BatchError::InconsistentChunk { position });
        }
        chunks.push(chunk);
    }
    Ok(chunks)
}

/// Writes one response packet.
pub fn write_packet<W: Write + ?Sized>(writer: &mut W, packet: &ResponsePacket) -> BatchResult<()> {
    let data = packet.data();
    let len = u32::try_from(data.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("packet payload of {} bytes does not fit in u32", data.len()),
        )
    })?;
    write_u8(writer, packet.block_type().as_u8())?;
    write_u32(writer, len)?;
    writer.write_all(data)?;
    Ok(())
}

/// Reads one response packet, rejecting unknown tags, literals longer than
/// `chunk_size` and reference payloads that are not 8 bytes.
pub fn read_packet<R: Read + ?Sized>(
    reader: &mut R,
    chunk_size: ChunkSize,
) -> BatchResult<ResponsePacket> {
    let tag = read_u8(reader)?;
    let block_type = BlockType::from_u8(tag).ok_or(BatchError::UnknownBlockType { tag })?;
    let len = read_u32(reader)?;
    match block_type {
        BlockType::Literal if len > chunk_size.as_u32() => {
            return Err(BatchError::OversizeLiteral {
                len,
                chunk_size: chunk_size.as_u32(),
            });
        }
        BlockType::Reference if len as usize != REFERENCE_PAYLOAD_LEN => {
            return Err(BatchError::ReferenceWidth { len });
        }
        _ => {}
    }
    let data = read_payload(reader, len as usize)?;
    Ok(ResponsePacket::from_raw_parts(block_type, data))
}

/// Writes a counted response.
pub fn write_response<W: Write + ?Sized>(writer: &mut W, response: &Response) -> BatchResult<()> {
    write_u64(writer, response.len() as u64)?;
    for packet in response {
        write_packet(writer, packet)?;
    }
    Ok(())
}

/// Reads a counted response.
pub fn read_response<R: Read + ?Sized>(
    reader: &mut R,
    chunk_size: ChunkSize,
) -> BatchResult<Response> {
    let count = read_u64(reader)?;
    let mut packets = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        packets.push(read_packet(reader, chunk_size)?);
    }
    Ok(Response::from_packets(packets))
}
