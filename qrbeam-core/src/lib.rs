//! QR Beam receiver core: block wire format, block-0 metadata and single-session reassembly.
//! Host-driven: no I/O; host passes decoded payloads and receives events.

pub mod block;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod integrity;
pub mod metadata;
pub mod progress;
pub mod reassembly;
pub mod receiver;
pub mod session;

pub mod ffi;

#[cfg(test)]
mod properties;

pub use block::{Block, HEADER_SIZE, METADATA_INDEX};
pub use config::ReceiverConfig;
pub use controller::{MetadataOutcome, SessionController};
pub use error::{BlockError, MetadataError, ReceiveError};
pub use frame::{DecodedFrame, Point};
pub use metadata::{parse_metadata, TransferMetadata};
pub use progress::Progress;
pub use reassembly::{apply_block, ApplyOutcome};
pub use receiver::{CompletedFile, Event, Receiver, TransferObserver};
pub use session::Session;
