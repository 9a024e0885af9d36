//! Common utilities for all binaries
//!
//! Shared CLI parsing, logging setup, and the replay loop that feeds ids into
//! a sequencer.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use underverse_core::config::DEFAULT_CAPACITY;
use underverse_core::{Sequencer, SequencerConfig, SequencerStats};

/// What the replay does with each fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolvePolicy {
    /// Leave gaps unknown; they are requested again on later arrivals
    None,
    /// Mark gaps as being fetched
    Pending,
    /// Mark gaps as fetched
    Complete,
}

/// Common CLI arguments for all binaries
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CommonArgs {
    /// File with one id per line (stdin when absent)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Highest id tracked by the ring
    #[arg(long)]
    pub capacity: Option<u64>,

    /// Initial cursor; negative starts at the stream origin
    #[arg(long, allow_hyphen_values = true)]
    pub initial_cursor: Option<i64>,

    /// How each gap is resolved
    #[arg(long, value_enum, default_value_t = ResolvePolicy::Pending)]
    pub resolve: ResolvePolicy,

    /// Log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,

    /// Print final statistics as JSON on stdout
    #[arg(long)]
    pub stats_json: bool,
}

impl CommonArgs {
    /// Merge the config file (if any), `UNDERVERSE_*` environment overrides
    /// and command line overrides, in that order
    pub fn sequencer_config(&self) -> Result<SequencerConfig> {
        self.sequencer_config_with(|key| std::env::var(key).ok())
    }

    /// Same as [`sequencer_config`](Self::sequencer_config), reading
    /// environment overrides through `lookup`
    pub fn sequencer_config_with<F>(&self, lookup: F) -> Result<SequencerConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => SequencerConfig::load_with(path, lookup)?,
            None => {
                let mut config = SequencerConfig {
                    capacity: DEFAULT_CAPACITY,
                    initial_cursor: Some(-1),
                    ..Default::default()
                };
                config.apply_overrides(lookup)?;
                config
            }
        };

        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(cursor) = self.initial_cursor {
            config.initial_cursor = Some(cursor);
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.json_logs |= self.json_logs;

        config.validate()?;
        Ok(config)
    }
}

/// Initialize tracing/logging
pub fn init_logging(config: &SequencerConfig) -> Result<()> {
    underverse_core::utils::init_logger(&config.log_level, config.json_logs)
}

/// Counts from one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Lines parsed as ids
    pub ids: u64,
    /// Lines that were not ids
    pub skipped: u64,
    /// Whether the run was interrupted before the input ended
    pub interrupted: bool,
}

/// Subscribe the gap logger and apply `policy` to each fetch
pub fn install_fetch_handler(seq: &mut Sequencer, policy: ResolvePolicy) {
    seq.on_fetch(move |fetch| {
        let missing = fetch.missing();
        tracing::warn!(
            "SEQUENCE GAP: {} ids missing ({}..={})",
            missing.len(),
            missing.first().copied().unwrap_or_default(),
            missing.last().copied().unwrap_or_default()
        );

        match policy {
            ResolvePolicy::None => {}
            ResolvePolicy::Pending => fetch.mark_pending(),
            ResolvePolicy::Complete => fetch.mark_complete(),
        }
    });
}

/// Feed every id in `reader` to the sequencer
///
/// Blank lines and `#` comments are ignored, unparsable lines are logged and
/// skipped. Stops early once `stop` is set.
///
/// `stop` is checked after each line is read and before it is applied. A
/// blocked read (an idle stdin, say) has to return first, and the line it
/// produced is dropped.
pub fn replay<R: BufRead>(seq: &mut Sequencer, reader: R, stop: &AtomicBool) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        if stop.load(Ordering::Relaxed) {
            summary.interrupted = true;
            break;
        }

        let line = line.with_context(|| format!("Failed to read input line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.parse::<u64>() {
            Ok(id) => {
                summary.ids += 1;
                if seq.received(id) {
                    tracing::trace!(id, "in order");
                } else {
                    tracing::debug!(id, cursor = ?seq.cursor(), "out of order");
                }
            }
            Err(e) => {
                summary.skipped += 1;
                tracing::warn!("Skipping line {}: '{}' is not an id ({})", index + 1, trimmed, e);
            }
        }
    }

    Ok(summary)
}

/// Print final statistics
pub fn print_stats(stats: &SequencerStats, summary: &ReplaySummary) {
    tracing::info!("=== Final Statistics ===");
    tracing::info!("Ids read: {} ({} lines skipped)", summary.ids, summary.skipped);
    tracing::info!("Received: {} ({} rejected)", stats.received, stats.rejected);
    tracing::info!("In order: {}", stats.in_order);
    tracing::info!("Out of order: {}", stats.out_of_order);
    tracing::info!("In-order rate: {:.2}%", stats.in_order_rate());
    tracing::info!(
        "Fetches: {} ({} positions requested)",
        stats.fetches_emitted,
        stats.positions_requested
    );
    tracing::info!("Overflows: {}", stats.overflows);

    if summary.interrupted {
        tracing::warn!("Replay interrupted before end of input");
    }
}
