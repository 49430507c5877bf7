//! One transfer attempt: the file buffer and the set of data blocks still missing.

use std::collections::{BTreeSet, HashMap};

use crate::metadata::TransferMetadata;

/// State of one in-progress or completed file reconstruction.
/// Only the reassembly engine writes `buffer` and `missing`.
#[derive(Debug)]
pub struct Session {
    pub(crate) metadata: TransferMetadata,
    pub(crate) buffer: Vec<u8>,
    pub(crate) missing: BTreeSet<u32>,
    /// (offset, len) each accepted data block wrote.
    pub(crate) placements: HashMap<u32, (u32, usize)>,
    pub(crate) opened_at: u64,
    pub(crate) received_metadata_at: u64,
    pub(crate) duplicates: u64,
    pub(crate) rejected: u64,
}

impl Session {
    /// Open a session with a zeroed buffer of the declared length and every data block missing.
    /// Caller has already bounded `file_length` to something addressable.
    pub(crate) fn open(metadata: TransferMetadata, buffer_len: usize, now: u64) -> Self {
        let missing = (1..=metadata.last_block_index).collect();
        Self {
            metadata,
            buffer: vec![0u8; buffer_len],
            missing,
            placements: HashMap::new(),
            opened_at: now,
            received_metadata_at: now,
            duplicates: 0,
            rejected: 0,
        }
    }

    pub fn metadata(&self) -> &TransferMetadata {
        &self.metadata
    }

    pub fn file_name(&self) -> &str {
        &self.metadata.file_name
    }

    /// File bytes as reassembled so far. Unreceived ranges are zero.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    pub fn missing(&self) -> &BTreeSet<u32> {
        &self.missing
    }

    pub fn is_missing(&self, index: u32) -> bool {
        self.missing.contains(&index)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Logical time the session was opened.
    pub fn opened_at(&self) -> u64 {
        self.opened_at
    }

    /// Logical time block 0 for this file was last seen (re-announcements refresh it).
    pub fn received_metadata_at(&self) -> u64 {
        self.received_metadata_at
    }

    /// Repeated deliveries of already-received blocks.
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Data blocks dropped for not fitting this session.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
