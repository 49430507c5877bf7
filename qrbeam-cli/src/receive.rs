//! Single consumer of the payload queue: the only place the receiver is touched.

use qrbeam_core::{BlockError, Event, ReceiveError, Receiver, TransferObserver};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Dropped payloads by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    pub truncated: u64,
    pub malformed_metadata: u64,
    pub out_of_bounds: u64,
    pub no_session: u64,
}

impl DropStats {
    fn record(&mut self, e: &ReceiveError) {
        match e {
            ReceiveError::Block(BlockError::Truncated { .. }) => self.truncated += 1,
            ReceiveError::Block(_) => self.out_of_bounds += 1,
            ReceiveError::Metadata(_) => self.malformed_metadata += 1,
            ReceiveError::NoActiveSession { .. } => self.no_session += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.truncated + self.malformed_metadata + self.out_of_bounds + self.no_session
    }
}

/// How the queue drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Complete,
    InputEnded,
    Interrupted,
}

/// Logs session changes and progress in 10% steps.
#[derive(Debug, Default)]
pub struct LogObserver {
    last_decile: Option<u32>,
}

impl TransferObserver for LogObserver {
    fn on_session_opened(&mut self, file_name: &str, file_length: u64, block_count: u32) {
        self.last_decile = None;
        info!(file = %file_name, length = file_length, blocks = block_count, "receiving");
    }

    fn on_progress(&mut self, received_count: u32, total_count: u32, ratio: f64) {
        let decile = (ratio * 10.0).floor() as u32;
        if self.last_decile != Some(decile) {
            self.last_decile = Some(decile);
            info!(received = received_count, total = total_count, "{:.0}%", ratio * 100.0);
        } else {
            debug!(received = received_count, total = total_count, "block stored");
        }
    }

    fn on_complete(&mut self, buffer: &[u8], file_name: &str) {
        info!(file = %file_name, bytes = buffer.len(), "all blocks received");
    }
}

/// Drain the queue into the receiver until the transfer completes or the input ends.
pub async fn consume(
    receiver: &mut Receiver,
    rx: &mut mpsc::Receiver<Vec<u8>>,
    observer: &mut impl TransferObserver,
    drops: &mut DropStats,
) -> Finish {
    while let Some(payload) = rx.recv().await {
        match receiver.on_payload(&payload) {
            Ok(events) => {
                receiver.dispatch(&events, observer);
                if events.iter().any(|e| matches!(e, Event::Complete { .. })) {
                    return Finish::Complete;
                }
            }
            Err(e) => drops.record(&e),
        }
    }
    Finish::InputEnded
}
