//! Progress derived from session state. No separate counters to drift.

use crate::session::Session;

/// UI-facing completion counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub received_count: u32,
    pub total_count: u32,
    /// received_count / total_count; 1.0 for a file with no data blocks.
    pub ratio: f64,
}

/// Snapshot the progress of a session.
pub fn snapshot(session: &Session) -> Progress {
    let total_count = session.metadata.last_block_index;
    let received_count = total_count - session.missing.len() as u32;
    let ratio = if total_count == 0 {
        1.0
    } else {
        received_count as f64 / total_count as f64
    };
    Progress {
        received_count,
        total_count,
        ratio,
    }
}

impl Session {
    pub fn progress(&self) -> Progress {
        snapshot(self)
    }
}
