#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Batch files for offline delta exchange.
//!
//! A batch records the result of one delta scan so that it can be carried to
//! a machine holding the reference and applied there later. The file holds
//! the chunk size, the reference chunk records the response was computed
//! against, and the response packets.
//!
//! # Batch File Format
//!
//! All integers are little-endian.
//!
//! 1. **Header**: magic [`BATCH_MAGIC`] followed by the chunk size (u32).
//! 2. **Chunk list**: record count (u64) and [`CHUNK_RECORD_LEN`]-byte
//!    records `{weak, strong, offset, size, index}`.
//! 3. **Response**: packet count (u64), then `{block_type, len, payload}`
//!    per packet, with `A` = 0 and `B` = 1.
//!
//! Decoding fails with a format error on a bad magic, unknown block types,
//! literal packets longer than one chunk, and reference payloads that are
//! not 8 bytes.
//!
//! # Examples
//!
//! ```
//! use batch::BatchFile;
//! use matching::{Response, ResponsePacket};
//! use signature::ChunkSize;
//!
//! let batch = BatchFile::new(
//!     ChunkSize::DEFAULT,
//!     Vec::new(),
//!     Response::from(vec![ResponsePacket::literal(b"hello".to_vec())]),
//! );
//! let mut encoded = Vec::new();
//! batch.write_to(&mut encoded)?;
//! assert_eq!(BatchFile::read_from(&mut encoded.as_slice())?, batch);
//! # Ok::<_, batch::BatchError>(())
//! ```

mod codec;
mod error;
mod file;
mod wire;

pub use codec::{
    BATCH_MAGIC, CHUNK_RECORD_LEN, read_chunk, read_chunk_list, read_header, read_packet,
    read_response, write_chunk, write_chunk_list, write_header, write_packet, write_response,
};
pub use error::{BatchError, BatchResult};
pub use file::BatchFile;
