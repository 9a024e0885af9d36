pub mod constants;
pub mod types;

pub use constants::*;
pub use types::SequencerConfig;

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::ConfigError;

impl SequencerConfig {
    /// Load configuration from a JSON file with environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load configuration from a JSON file, taking overrides from `lookup`
    pub fn load_with<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let config_path = path.as_ref();

        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let mut cfg: SequencerConfig =
            serde_json::from_str(&raw).context("Failed to deserialize configuration")?;

        // Override with environment variables (UNDERVERSE_)
        cfg.apply_overrides(lookup)?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(capacity) = lookup(ENV_CAPACITY) {
            self.capacity = capacity
                .trim()
                .parse()
                .with_context(|| format!("{} must be an unsigned integer, got '{}'", ENV_CAPACITY, capacity))?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_lowercase();
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }

        if let Some(cursor) = self.initial_cursor {
            if cursor >= 0 && cursor as u64 > self.capacity {
                return Err(ConfigError::CursorOutOfRange {
                    cursor,
                    capacity: self.capacity,
                });
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }
}
