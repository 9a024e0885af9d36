//! Ring sizing limits

/// Ring capacity when none is configured
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Largest ring a configuration may ask for
///
/// One byte per slot, so this bounds the allocation to 256 MiB.
pub const MAX_CAPACITY: u64 = 1 << 28;

/// Environment variable overriding the configured capacity
pub const ENV_CAPACITY: &str = "UNDERVERSE_CAPACITY";

/// Environment variable overriding the configured log level
pub const ENV_LOG_LEVEL: &str = "UNDERVERSE_LOG_LEVEL";

/// Log levels accepted by configuration
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
