//! Reassembly engine: place data blocks into the session buffer and shrink the missing set.

use tracing::debug;

use crate::block::Block;
use crate::error::BlockError;
use crate::session::Session;

/// What applying a data block did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Block written and removed from the missing set.
    Stored { complete: bool },
    /// Block was already received at the same placement; nothing changed.
    Duplicate,
}

/// Apply one data block to the session. Rejected blocks leave `missing` and `buffer` untouched.
/// First writer wins: a repeat of an index at a different offset or length is rejected.
pub fn apply_block(session: &mut Session, block: &Block) -> Result<ApplyOutcome, BlockError> {
    let result = place(session, block);
    if let Err(e) = &result {
        session.rejected += 1;
        debug!(file = %session.metadata.file_name, error = %e, "dropped block");
    }
    result
}

fn place(session: &mut Session, block: &Block) -> Result<ApplyOutcome, BlockError> {
    let last = session.metadata.last_block_index;
    if block.index == 0 || block.index > last {
        return Err(BlockError::IndexOutOfRange {
            index: block.index,
            last,
        });
    }
    let len = block.payload.len();
    if let Some(&(offset, prev_len)) = session.placements.get(&block.index) {
        if offset != block.offset || prev_len != len {
            return Err(BlockError::ConflictingPlacement { index: block.index });
        }
        session.duplicates += 1;
        debug!(index = block.index, "duplicate block");
        return Ok(ApplyOutcome::Duplicate);
    }
    if block.end() > session.buffer.len() as u64 {
        return Err(BlockError::PastEnd {
            index: block.index,
            offset: block.offset,
            len,
            file_length: session.metadata.file_length,
        });
    }
    let start = block.offset as usize;
    session.buffer[start..start + len].copy_from_slice(&block.payload);
    session.placements.insert(block.index, (block.offset, len));
    session.missing.remove(&block.index);
    Ok(ApplyOutcome::Stored {
        complete: session.is_complete(),
    })
}
