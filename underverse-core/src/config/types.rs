use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_CAPACITY;

/// Sequencer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Highest id the ring tracks; the ring holds `capacity + 1` slots
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Cursor to start from: negative starts at the stream origin, a
    /// position seeds the confirmed prefix, absent leaves it inactive
    #[serde(default)]
    pub initial_cursor: Option<i64>,

    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

// Default value functions
fn default_capacity() -> u64 {
    DEFAULT_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            initial_cursor: None,
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}
