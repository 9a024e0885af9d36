//! Replay an id stream through a sequencer
//!
//! Reads one id per line from a file or stdin, reports every gap the
//! sequencer detects, and prints arrival statistics at the end. Ctrl-C stops
//! the replay early and still prints the statistics.
//!
//! The stop request is noticed when the next line has been read. On an idle
//! stdin that may never happen, so a second Ctrl-C exits at once.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use underverse_bins::common::{init_logging, install_fetch_handler, print_stats, replay, CommonArgs};
use underverse_core::Sequencer;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = CommonArgs::parse();
    let config = args.sequencer_config()?;

    // Initialize logging
    init_logging(&config)?;

    tracing::info!("=== Underverse: Sequence Replay ===");
    tracing::info!(
        "Capacity: {}, initial cursor: {:?}, resolve policy: {:?}",
        config.capacity,
        config.initial_cursor,
        args.resolve
    );

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
        tracing::warn!("Stopping at the next input line, press Ctrl-C again to exit now");
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut seq = Sequencer::from_config(&config)?;
    install_fetch_handler(&mut seq, args.resolve);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let summary = replay(&mut seq, reader, &stop)?;

    // Print final statistics
    let stats = seq.stats();
    print_stats(&stats, &summary);

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}
