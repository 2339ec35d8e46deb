//! crates/match/src/response.rs
//!
//! Packets describing the source in terms of literal bytes and reference
//! chunk indices.

use std::fmt;

/// Length in bytes of a reference packet payload.
pub const REFERENCE_PAYLOAD_LEN: usize = 8;

/// Kind of a [`ResponsePacket`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum BlockType {
    /// Literal bytes from the source (`A`).
    Literal = 0,
    /// A reference chunk index encoded as 8 little-endian bytes (`B`).
    Reference = 1,
}

impl BlockType {
    /// Wire tag of the block type.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a wire tag.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Literal),
            1 => Some(Self::Reference),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Literal => "A",
            Self::Reference => "B",
        })
    }
}

/// One element of a [`Response`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResponsePacket {
    block_type: BlockType,
    data: Vec<u8>,
}

impl ResponsePacket {
    /// Builds a packet from raw parts without validating the payload.
    ///
    /// Decoders use this to carry packets whose payload is checked later by
    /// the reconstructor.
    #[must_use]
    pub const fn from_raw_parts(block_type: BlockType, data: Vec<u8>) -> Self {
        Self { block_type, data }
    }

    /// Literal packet carrying `data`.
    #[must_use]
    pub const fn literal(data: Vec<u8>) -> Self {
        Self::from_raw_parts(BlockType::Literal, data)
    }

    /// Reference packet for reference chunk `index`.
    #[must_use]
    pub fn reference(index: u64) -> Self {
        Self::from_raw_parts(BlockType::Reference, index.to_le_bytes().to_vec())
    }

    /// Packet kind.
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Raw payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether this is a literal packet.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self.block_type, BlockType::Literal)
    }

    /// Decoded chunk index of a well-formed reference packet.
    ///
    /// Returns `None` for literal packets and for reference payloads that are
    /// not exactly [`REFERENCE_PAYLOAD_LEN`] bytes long.
    #[must_use]
    pub fn chunk_index(&self) -> Option<u64> {
        if self.block_type != BlockType::Reference {
            return None;
        }
        let bytes: [u8; REFERENCE_PAYLOAD_LEN] = self.data.as_slice().try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }
}

/// Ordered packet sequence describing a source file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Response {
    packets: Vec<ResponsePacket>,
}

impl Response {
    /// Empty response.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packets: Vec::new(),
        }
    }

    /// Wraps an existing packet list.
    #[must_use]
    pub const fn from_packets(packets: Vec<ResponsePacket>) -> Self {
        Self { packets }
    }

    /// Appends a packet.
    pub fn push(&mut self, packet: ResponsePacket) {
        self.packets.push(packet);
    }

    /// Packets in emission order.
    #[must_use]
    pub fn packets(&self) -> &[ResponsePacket] {
        &self.packets
    }

    /// Iterates over the packets.
    pub fn iter(&self) -> std::slice::Iter<'_, ResponsePacket> {
        self.packets.iter()
    }

    /// Number of packets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether the response holds no packets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Total literal payload bytes.
    #[must_use]
    pub fn literal_bytes(&self) -> u64 {
        self.packets
            .iter()
            .filter(|packet| packet.is_literal())
            .map(|packet| packet.data.len() as u64)
            .sum()
    }

    /// Number of reference packets.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.packets
            .iter()
            .filter(|packet| !packet.is_literal())
            .count()
    }

    /// Length of the file the response reconstructs when every reference
    /// covers `chunk_size` bytes.
    #[must_use]
    pub fn target_len(&self, chunk_size: u64) -> u64 {
        self.literal_bytes() + self.reference_count() as u64 * chunk_size
    }
}

impl From<Vec<ResponsePacket>> for Response {
    fn from(packets: Vec<ResponsePacket>) -> Self {
        Self::from_packets(packets)
    }
}

impl IntoIterator for Response {
    type Item = ResponsePacket;
    type IntoIter = std::vec::IntoIter<ResponsePacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.into_iter()
    }
}

impl<'a> IntoIterator for &'a Response {
    type Item = &'a ResponsePacket;
    type IntoIter = std::slice::Iter<'a, ResponsePacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}
