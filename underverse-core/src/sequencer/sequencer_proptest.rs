//! Property-based tests for the sequencer
//!
//! Random arrival orders and random slice bounds, checked against the
//! invariants the gap detection relies on.

use super::{Ring, Sequencer};
use crate::core::{Cursor, SlotState};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn record_pending(seq: &mut Sequencer) -> Arc<Mutex<Vec<Vec<u64>>>> {
    let fetches = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fetches);
    seq.on_fetch(move |fetch| {
        sink.lock().unwrap().push(fetch.missing().to_vec());
        fetch.mark_pending();
    });
    fetches
}

proptest! {
    /// Property: ids past capacity are always rejected without a fetch
    #[test]
    fn prop_out_of_range_rejected(capacity in 1u64..500, excess in 1u64..10_000) {
        let mut seq = Sequencer::new(capacity);
        seq.start();
        let fetches = record_pending(&mut seq);

        prop_assert!(!seq.received(capacity + excess));
        prop_assert!(fetches.lock().unwrap().is_empty());
        prop_assert_eq!(seq.cursor(), Cursor::Origin);
    }

    /// Property: a gap-free run after the cursor is always in order
    #[test]
    fn prop_contiguous_run_in_order(first in 1u64..400, len in 1u64..100) {
        let mut seq = Sequencer::new(1_000);
        seq.initialize(first - 1);
        let fetches = record_pending(&mut seq);

        for id in first..first + len {
            prop_assert!(seq.received(id), "id {} not in order", id);
        }
        prop_assert!(fetches.lock().unwrap().is_empty());
        prop_assert_eq!(seq.position(), Some(first + len - 1));
    }

    /// Property: the reported gap is exactly the unknown positions between
    /// the cursor and the id, and a pending position is never reported twice
    #[test]
    fn prop_gap_matches_unknown_positions(ids in prop::collection::vec(0u64..200, 1..60)) {
        let mut seq = Sequencer::new(1_000);
        seq.start();
        let fetches = record_pending(&mut seq);

        for id in ids {
            let start = seq.cursor().following().unwrap();
            let expected: Vec<u64> = seq
                .positions_between(start, id)
                .into_iter()
                .filter(|&p| p != id && seq.slot(p) == Some(SlotState::Unknown))
                .collect();
            let before = fetches.lock().unwrap().len();

            let in_order = seq.received(id);

            let fetches = fetches.lock().unwrap();
            if in_order || expected.is_empty() {
                prop_assert_eq!(fetches.len(), before);
            } else {
                prop_assert_eq!(fetches.len(), before + 1);
                prop_assert_eq!(fetches.last().unwrap(), &expected);
            }
        }

        let mut seen = HashSet::new();
        for position in fetches.lock().unwrap().iter().flatten() {
            prop_assert!(seen.insert(*position), "position {} requested twice", position);
        }
    }

    /// Property: the cursor always sits on a confirmed slot
    #[test]
    fn prop_cursor_slot_confirmed(ids in prop::collection::vec(0u64..=50, 1..200)) {
        let mut seq = Sequencer::new(50);
        seq.start();
        record_pending(&mut seq);

        for id in ids {
            seq.received(id);
            if let Some(position) = seq.position() {
                prop_assert_eq!(seq.slot(position), Some(SlotState::Confirmed));
            }
        }
    }

    /// Property: slices are empty iff the normalized bounds match, and walk
    /// the ring one successor at a time
    #[test]
    fn prop_slice_walks_ring(capacity in 1u64..300, start in 0u64..400, end in 0u64..400) {
        let ring = Ring::new(capacity);
        let slice = ring.positions_between(start, end);

        let norm = |b: u64| if b > capacity { 0 } else { b };
        let (s, e) = (norm(start), norm(end));

        prop_assert_eq!(slice.is_empty(), s == e);
        if s != e {
            prop_assert_eq!(slice[0], s);
            prop_assert_eq!(ring.successor(*slice.last().unwrap()), e);
            for pair in slice.windows(2) {
                prop_assert_eq!(ring.successor(pair[0]), pair[1]);
            }
            prop_assert!(slice.iter().all(|&p| p <= capacity));
            prop_assert!(slice.len() <= ring.len());
        }
    }
}
