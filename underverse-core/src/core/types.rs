//! Slot and cursor state for the sequencer ring

use serde::{Deserialize, Serialize};

/// Status of a single ring position
///
/// Only the status is tracked, never the message that occupies the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    /// Never observed
    #[default]
    Unknown,
    /// Reported missing, fetch in flight
    Pending,
    /// Observed, or fetched after a gap
    Confirmed,
}

impl SlotState {
    /// State a fetch resolution writes to its positions
    ///
    /// An incomplete resolution only records that a fetch is underway.
    #[inline]
    pub fn from_resolution(complete: bool) -> Self {
        if complete {
            SlotState::Confirmed
        } else {
            SlotState::Pending
        }
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == SlotState::Unknown
    }
}

/// Position of the sequencer cursor
///
/// The cursor marks the end of the unbroken, confirmed prefix of the stream.
/// While it is `At(p)`, the slot at `p` is always `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    /// Not initialized: arrivals are recorded but never reconciled
    #[default]
    Inactive,
    /// Stream started, nothing confirmed yet; the next in-order id is 0
    Origin,
    /// Last position of the confirmed prefix
    At(u64),
}

impl Cursor {
    /// Confirmed position, if any
    #[inline]
    pub fn position(&self) -> Option<u64> {
        match self {
            Cursor::At(position) => Some(*position),
            _ => None,
        }
    }

    /// First position after the cursor, before ring wrapping is applied
    ///
    /// `None` while inactive. For `At(capacity)` this is `capacity + 1`,
    /// which ring slicing normalizes back to 0.
    #[inline]
    pub fn following(&self) -> Option<u64> {
        match self {
            Cursor::Inactive => None,
            Cursor::Origin => Some(0),
            Cursor::At(position) => Some(position.saturating_add(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_states() {
        assert_eq!(SlotState::from_resolution(false), SlotState::Pending);
        assert_eq!(SlotState::from_resolution(true), SlotState::Confirmed);
    }

    #[test]
    fn test_default_slot_is_unknown() {
        assert!(SlotState::default().is_unknown());
        assert!(!SlotState::Pending.is_unknown());
    }

    #[test]
    fn test_cursor_following() {
        assert_eq!(Cursor::Inactive.following(), None);
        assert_eq!(Cursor::Origin.following(), Some(0));
        assert_eq!(Cursor::At(41).following(), Some(42));
        assert_eq!(Cursor::At(u64::MAX).following(), Some(u64::MAX));
    }

    #[test]
    fn test_cursor_position() {
        assert_eq!(Cursor::default(), Cursor::Inactive);
        assert_eq!(Cursor::Inactive.position(), None);
        assert_eq!(Cursor::Origin.position(), None);
        assert_eq!(Cursor::At(7).position(), Some(7));
    }

    #[test]
    fn test_cursor_serializes_snake_case() {
        let json = serde_json::to_string(&Cursor::At(3)).unwrap();
        assert_eq!(json, r#"{"at":3}"#);
        let json = serde_json::to_string(&SlotState::Pending).unwrap();
        assert_eq!(json, r#""pending""#);
    }
}
