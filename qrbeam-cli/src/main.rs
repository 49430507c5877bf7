// qrbeam: receiver host. Reads captured QR payloads, rebuilds the broadcast file, saves it.

mod args;
mod config;
mod input;
mod logging;
mod output;
mod receive;

use anyhow::{bail, Context};
use clap::Parser;
use qrbeam_core::{integrity, Receiver, ReceiverConfig};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::receive::{DropStats, Finish, LogObserver};

/// Decoded payloads buffered between the capture reader and the receiver.
const CAPTURE_QUEUE_DEPTH: usize = 64;

fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();
    logging::init_logging(args.verbose)?;

    let mut cfg = config::load(args.config.as_deref())?;
    args.merge_into(&mut cfg);
    let expected = args
        .expect_sha256
        .as_deref()
        .map(output::parse_digest)
        .transpose()?;

    let rt = tokio::runtime::Runtime::new().context("starting runtime")?;
    rt.block_on(run(args, cfg, expected))
}

async fn run(
    args: args::Args,
    cfg: config::Config,
    expected: Option<[u8; 32]>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel(CAPTURE_QUEUE_DEPTH);
    let reader = tokio::spawn(input::read_payloads(args.input_path().cloned(), tx));

    let mut receiver = Receiver::new(ReceiverConfig::with_max_file_length(cfg.max_file_length));
    let mut observer = LogObserver::default();
    let mut drops = DropStats::default();
    let finish = tokio::select! {
        f = receive::consume(&mut receiver, &mut rx, &mut observer, &mut drops) => f,
        r = shutdown_signal() => {
            r?;
            warn!("interrupted");
            Finish::Interrupted
        }
    };
    if finish != Finish::InputEnded {
        // Reader may be parked on stdin; nothing it reads now matters.
        reader.abort();
    }

    // A reader failure only ends the input; whatever was received is still saved.
    let mut reader_error = None;
    match reader.await {
        Ok(Ok(stats)) => info!(
            lines = stats.lines,
            payloads = stats.payloads,
            undecodable = stats.undecodable,
            "capture read"
        ),
        Ok(Err(e)) => {
            warn!(error = %e, "capture reader stopped");
            reader_error = Some(e);
        }
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e).context("capture reader panicked"),
    }
    if drops.total() > 0 {
        info!(
            truncated = drops.truncated,
            malformed_metadata = drops.malformed_metadata,
            out_of_bounds = drops.out_of_bounds,
            no_session = drops.no_session,
            "dropped payloads"
        );
    }

    let Some(progress) = receiver.progress() else {
        if let Some(e) = reader_error {
            return Err(e);
        }
        bail!("no valid metadata block seen; nothing to save");
    };
    let Some(file) = receiver.take_file(cfg.allow_partial) else {
        bail!(
            "transfer incomplete: {}/{} blocks received (use --allow-partial to save anyway)",
            progress.received_count,
            progress.total_count
        );
    };
    if let Some(expected) = expected {
        if !integrity::verify_file(&file.data, &expected) {
            bail!("SHA-256 mismatch for {}", file.file_name);
        }
    }

    let path = output::save(&cfg.output_dir, &file).await?;
    if !file.complete {
        warn!(
            received = progress.received_count,
            total = progress.total_count,
            "saved partial file"
        );
    }
    println!(
        "{}\t{} bytes\tsha256 {}{}",
        path.display(),
        file.data.len(),
        hex::encode(file.digest),
        if file.complete { "" } else { "\tPARTIAL" }
    );
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM (Unix).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            r = tokio::signal::ctrl_c() => r?,
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}
