//! Receiver limits.

/// Default cap on the file length a metadata block may declare (256 MiB).
pub const DEFAULT_MAX_FILE_LENGTH: u64 = 256 * 1024 * 1024;

/// Default cap on the number of data blocks a metadata block may declare.
pub const DEFAULT_MAX_BLOCK_COUNT: u32 = 1 << 20;

/// Limits applied before a session allocates its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Largest `fileLength` a block 0 may announce. Larger announcements are rejected as malformed.
    pub max_file_length: u64,
    /// Largest `lastBlockIndex` a block 0 may announce. The missing set is sized from it.
    pub max_block_count: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            max_file_length: DEFAULT_MAX_FILE_LENGTH,
            max_block_count: DEFAULT_MAX_BLOCK_COUNT,
        }
    }
}

impl ReceiverConfig {
    pub fn with_max_file_length(max_file_length: u64) -> Self {
        Self {
            max_file_length,
            ..Self::default()
        }
    }

    pub fn with_max_block_count(mut self, max_block_count: u32) -> Self {
        self.max_block_count = max_block_count;
        self
    }
}
