//! Sequence tracking for monotonically issued ids
//!
//! Detects ids that should have arrived but have not, without buffering the
//! messages that carry them:
//! - `ring`: circular slot storage and ring-order slicing
//! - `tracker`: the `Sequencer` state machine
//! - `notify`: fetch events and their resolution
//! - `stats`: running counters

pub mod notify;
pub mod ring;
pub mod stats;
pub mod tracker;

#[cfg(test)]
mod sequencer_proptest;

pub use notify::{Fetch, FetchListeners, FetchRequest, ListenerId};
pub use ring::Ring;
pub use stats::SequencerStats;
pub use tracker::Sequencer;
