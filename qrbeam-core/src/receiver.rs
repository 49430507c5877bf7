//! Host-driven API: the host feeds decoded payloads one at a time and receives events.

use tracing::{debug, info};

use crate::block::Block;
use crate::config::ReceiverConfig;
use crate::controller::{MetadataOutcome, SessionController};
use crate::error::ReceiveError;
use crate::frame::DecodedFrame;
use crate::integrity;
use crate::metadata;
use crate::progress::Progress;
use crate::reassembly::{self, ApplyOutcome};
use crate::session::Session;

/// UI-facing output of one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionOpened {
        file_name: String,
        file_length: u64,
        block_count: u32,
    },
    Progress(Progress),
    /// Emitted once per session, when the last missing block arrives.
    Complete {
        file_name: String,
        file_length: u64,
        digest: [u8; 32],
    },
}

/// UI callbacks. Hosts implement what they display; all methods default to no-ops.
pub trait TransferObserver {
    fn on_session_opened(&mut self, _file_name: &str, _file_length: u64, _block_count: u32) {}
    fn on_progress(&mut self, _received_count: u32, _total_count: u32, _ratio: f64) {}
    fn on_complete(&mut self, _buffer: &[u8], _file_name: &str) {}
}

/// File handed out by [`Receiver::take_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedFile {
    pub file_name: String,
    pub data: Vec<u8>,
    pub digest: [u8; 32],
    /// False when taken before every block arrived.
    pub complete: bool,
}

/// Single-session receiver. Takes `&mut self`: payloads are processed strictly one at a time.
pub struct Receiver {
    controller: SessionController,
}

impl Receiver {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            controller: SessionController::new(config),
        }
    }

    /// Process one frame from the external decoder. Corner points are ignored.
    pub fn on_frame(&mut self, frame: &DecodedFrame) -> Result<Vec<Event>, ReceiveError> {
        self.on_payload(&frame.payload)
    }

    /// Process one raw payload. Errors mean the payload was dropped; the session is unaffected.
    pub fn on_payload(&mut self, raw: &[u8]) -> Result<Vec<Event>, ReceiveError> {
        self.controller.tick();
        let result = self.process(raw);
        if let Err(e) = &result {
            debug!(error = %e, "payload dropped");
        }
        result
    }

    fn process(&mut self, raw: &[u8]) -> Result<Vec<Event>, ReceiveError> {
        let block = Block::decode(raw)?;
        if block.is_metadata() {
            return self.on_metadata_block(&block);
        }
        let Some(session) = self.controller.current_session_mut() else {
            return Err(ReceiveError::NoActiveSession { index: block.index });
        };
        match reassembly::apply_block(session, &block)? {
            ApplyOutcome::Duplicate => Ok(vec![]),
            ApplyOutcome::Stored { complete } => {
                let mut events = vec![Event::Progress(session.progress())];
                if complete {
                    events.push(complete_event(session));
                }
                Ok(events)
            }
        }
    }

    fn on_metadata_block(&mut self, block: &Block) -> Result<Vec<Event>, ReceiveError> {
        let meta = metadata::parse_metadata(&block.payload)?;
        match self.controller.on_metadata(meta)? {
            MetadataOutcome::Reannounced => Ok(vec![]),
            MetadataOutcome::Opened => {
                let Some(session) = self.controller.current_session() else {
                    return Ok(vec![]);
                };
                let meta = session.metadata();
                let mut events = vec![
                    Event::SessionOpened {
                        file_name: meta.file_name.clone(),
                        file_length: meta.file_length,
                        block_count: meta.last_block_index,
                    },
                    Event::Progress(session.progress()),
                ];
                if session.is_complete() {
                    events.push(complete_event(session));
                }
                Ok(events)
            }
        }
    }

    /// Discard the active session. Data blocks are refused until the next block 0.
    pub fn reset(&mut self) -> bool {
        self.controller.reset()
    }

    pub fn session(&self) -> Option<&Session> {
        self.controller.current_session()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session().map(Session::progress)
    }

    pub fn is_complete(&self) -> bool {
        self.session().is_some_and(Session::is_complete)
    }

    /// Take the reassembled file out, ending the session. An incomplete session is only handed
    /// out when `allow_partial` is set; otherwise it stays active and `None` is returned.
    pub fn take_file(&mut self, allow_partial: bool) -> Option<CompletedFile> {
        let session = self.session()?;
        let complete = session.is_complete();
        if !complete && !allow_partial {
            return None;
        }
        let session = self.controller.take_session()?;
        let file_name = session.file_name().to_string();
        let data = session.into_buffer();
        let digest = integrity::hash_file(&data);
        Some(CompletedFile {
            file_name,
            data,
            digest,
            complete,
        })
    }

    /// Forward events to UI callbacks.
    pub fn dispatch(&self, events: &[Event], observer: &mut impl TransferObserver) {
        for event in events {
            match event {
                Event::SessionOpened {
                    file_name,
                    file_length,
                    block_count,
                } => observer.on_session_opened(file_name, *file_length, *block_count),
                Event::Progress(p) => observer.on_progress(p.received_count, p.total_count, p.ratio),
                Event::Complete { file_name, .. } => {
                    if let Some(session) = self.session() {
                        observer.on_complete(session.buffer(), file_name);
                    }
                }
            }
        }
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

fn complete_event(session: &Session) -> Event {
    let meta = session.metadata();
    info!(file = %meta.file_name, length = meta.file_length, "transfer complete");
    Event::Complete {
        file_name: meta.file_name.clone(),
        file_length: meta.file_length,
        digest: integrity::hash_file(session.buffer()),
    }
}
