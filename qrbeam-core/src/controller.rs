//! Session controller: opens, replaces and discards the single active session.

use tracing::info;

use crate::config::ReceiverConfig;
use crate::error::MetadataError;
use crate::metadata::TransferMetadata;
use crate::session::Session;

/// Result of handling a metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// A new session replaced whatever was active.
    Opened,
    /// Same file announced again by the looping broadcaster; session untouched.
    Reannounced,
}

/// Owns the active session (at most one) and the logical clock.
pub struct SessionController {
    config: ReceiverConfig,
    session: Option<Session>,
    clock: u64,
}

impl SessionController {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            session: None,
            clock: 0,
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Advance the logical clock. Called once per payload handed to the receiver.
    pub fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Open a session for `meta` unless the active one already describes the same file.
    /// A different name or length discards the previous buffer and progress in full.
    pub fn on_metadata(&mut self, meta: TransferMetadata) -> Result<MetadataOutcome, MetadataError> {
        if let Some(session) = self.session.as_mut() {
            if session.metadata.same_file(&meta) {
                session.received_metadata_at = self.clock;
                return Ok(MetadataOutcome::Reannounced);
            }
        }
        let buffer_len = self.check_limits(&meta)?;
        info!(
            file = %meta.file_name,
            length = meta.file_length,
            blocks = meta.last_block_index,
            replaced = self.session.is_some(),
            "session opened"
        );
        self.session = Some(Session::open(meta, buffer_len, self.clock));
        Ok(MetadataOutcome::Opened)
    }

    /// Bound the buffer and the missing set before anything is allocated.
    /// A data block carries at least one byte unless the file is empty.
    fn check_limits(&self, meta: &TransferMetadata) -> Result<usize, MetadataError> {
        if meta.file_length > self.config.max_file_length {
            return Err(MetadataError::TooLarge {
                file_length: meta.file_length,
                max: self.config.max_file_length,
            });
        }
        let max_blocks = meta
            .file_length
            .max(1)
            .min(self.config.max_block_count as u64);
        if meta.last_block_index as u64 > max_blocks {
            return Err(MetadataError::TooManyBlocks {
                block_count: meta.last_block_index,
                max: max_blocks,
            });
        }
        usize::try_from(meta.file_length).map_err(|_| MetadataError::TooLarge {
            file_length: meta.file_length,
            max: usize::MAX as u64,
        })
    }

    /// Discard the active session. Returns whether there was one.
    pub fn reset(&mut self) -> bool {
        let discarded = self.session.take();
        if let Some(s) = &discarded {
            info!(file = %s.metadata.file_name, "session reset");
        }
        discarded.is_some()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(crate) fn current_session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Hand the session and its buffer to the caller, leaving none active.
    pub fn take_session(&mut self) -> Option<Session> {
        self.session.take()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}
