//! Capture reader: one hex-encoded payload per line, pushed into the receive queue.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Counts from one pass over the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub lines: u64,
    pub payloads: u64,
    pub undecodable: u64,
}

/// Decode one capture line. `None` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<Result<Vec<u8>, hex::FromHexError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(hex::decode(line))
}

/// Read the capture from a file, or stdin when `path` is `None`.
pub async fn read_payloads(
    path: Option<PathBuf>,
    tx: mpsc::Sender<Vec<u8>>,
) -> anyhow::Result<InputStats> {
    match path {
        Some(p) => {
            let file = tokio::fs::File::open(&p)
                .await
                .with_context(|| format!("opening capture {}", p.display()))?;
            pump(BufReader::new(file), tx).await
        }
        None => pump(BufReader::new(tokio::io::stdin()), tx).await,
    }
}

/// Forward decoded payloads until input ends or the receiver hangs up.
/// Lines that are not UTF-8 or not hex are counted and skipped.
pub async fn pump<R: AsyncBufRead + Unpin>(
    mut reader: R,
    tx: mpsc::Sender<Vec<u8>>,
) -> anyhow::Result<InputStats> {
    let mut stats = InputStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("reading capture")?;
        if n == 0 {
            break;
        }
        stats.lines += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                stats.undecodable += 1;
                warn!(line = stats.lines, error = %e, "skipping non-UTF-8 line");
                continue;
            }
        };
        match parse_line(line) {
            None => {}
            Some(Ok(payload)) => {
                stats.payloads += 1;
                if tx.send(payload).await.is_err() {
                    debug!(line = stats.lines, "receiver finished, stop reading");
                    break;
                }
            }
            Some(Err(e)) => {
                stats.undecodable += 1;
                warn!(line = stats.lines, error = %e, "skipping undecodable line");
            }
        }
    }
    Ok(stats)
}
