//! Error taxonomy. Every error here is local to one payload: the payload is dropped and the
//! active session carries on.

/// Block could not be decoded or does not fit the active session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("truncated block: {len} bytes, need at least 8")]
    Truncated { len: usize },
    #[error("block index {index} outside 1..={last}")]
    IndexOutOfRange { index: u32, last: u32 },
    #[error("block {index} writes {len} bytes at offset {offset}, past end of {file_length}-byte file")]
    PastEnd {
        index: u32,
        offset: u32,
        len: usize,
        file_length: u64,
    },
    #[error("block {index} already received with a different placement")]
    ConflictingPlacement { index: u32 },
}

impl BlockError {
    /// True for the out-of-bounds class: the block decoded but does not belong where it says.
    pub fn is_out_of_bounds(&self) -> bool {
        !matches!(self, BlockError::Truncated { .. })
    }
}

/// Block 0 payload is not valid transfer metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("malformed metadata: {0}")]
    Json(#[from] serde_json::Error),
    #[error("metadata has an empty file name")]
    EmptyFileName,
    #[error("declared file length {file_length} exceeds limit of {max} bytes")]
    TooLarge { file_length: u64, max: u64 },
    #[error("declared block count {block_count} exceeds limit of {max}")]
    TooManyBlocks { block_count: u32, max: u64 },
}

/// Anything that made the receiver drop a payload.
#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("block {index} arrived with no active session")]
    NoActiveSession { index: u32 },
}
