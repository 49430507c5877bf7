//! Block wire format: 4 bytes LE index + 4 bytes LE offset + payload.

use crate::error::BlockError;

/// Size of the fixed block header (index + offset).
pub const HEADER_SIZE: usize = 8;

/// Index reserved for the metadata block.
pub const METADATA_INDEX: u32 = 0;

/// One transmitted unit, as carried by a single visual code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: u32,
    /// Byte offset into the destination file.
    pub offset: u32,
    pub payload: Vec<u8>,
}

impl Block {
    pub fn new(index: u32, offset: u32, payload: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            payload,
        }
    }

    /// Decode a raw payload extracted from a visual code.
    /// Anything after the 8-byte header is payload, including nothing at all.
    pub fn decode(raw: &[u8]) -> Result<Self, BlockError> {
        if raw.len() < HEADER_SIZE {
            return Err(BlockError::Truncated { len: raw.len() });
        }
        let index = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let offset = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        Ok(Self {
            index,
            offset,
            payload: raw[HEADER_SIZE..].to_vec(),
        })
    }

    /// Encode into the wire layout. Used by hosts that replay or synthesize captures.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        out.extend_from_slice(&self.index.to_le_bytes());
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn is_metadata(&self) -> bool {
        self.index == METADATA_INDEX
    }

    /// End of the byte range this block covers, widened so it cannot overflow.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.payload.len() as u64
    }
}
