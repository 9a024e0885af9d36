//! Core value types shared by the sequencer and its configuration
//!
//! - `SlotState`: 3-valued status of one ring position
//! - `Cursor`: end of the confirmed, in-order prefix
//! - `ConfigError`: rejected configuration

pub mod errors;
pub mod types;

pub use errors::ConfigError;
pub use types::{Cursor, SlotState};
