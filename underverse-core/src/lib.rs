//! Underverse Core - Sequence gap tracking for ordered id streams
//!
//! Tracks the arrival order of monotonically issued ids (message or packet
//! sequence numbers) and reports the ids that should have arrived but have
//! not. Messages themselves are never buffered: each id owns one slot in a
//! fixed ring holding a 3-valued status.
//!
//! ## Architecture
//! - **Fixed ring** of `capacity + 1` slots, allocated once
//! - **Cursor** at the end of the confirmed, in-order prefix
//! - **Synchronous fetch events** listing the unknown ids behind an
//!   out-of-order arrival
//! - **No internal locking**: one writer at a time, enforced by `&mut self`
//!
//! ## Modules
//! - `core`: slot and cursor state, configuration errors
//! - `sequencer`: the ring, the `Sequencer`, fetch notifications, stats
//! - `config`: JSON configuration with environment overrides
//! - `utils`: logging setup

pub mod config;
pub mod core;
pub mod sequencer;
pub mod utils;

pub use crate::config::SequencerConfig;
pub use crate::core::{ConfigError, Cursor, SlotState};
pub use crate::sequencer::{Fetch, FetchRequest, ListenerId, Ring, Sequencer, SequencerStats};

pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SequencerConfig;
    pub use crate::core::{Cursor, SlotState};
    pub use crate::sequencer::{Fetch, FetchRequest, ListenerId, Sequencer, SequencerStats};
    pub use crate::{Error, Result};
}
