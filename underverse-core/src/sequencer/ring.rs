//! Circular slot storage
//!
//! A ring of capacity `N` addresses positions `0..=N`, so it holds `N + 1`
//! slots. Walking forward from `N` lands on `0`.

use crate::core::SlotState;

/// Fixed-size circular array of slot states
#[derive(Debug, Clone)]
pub struct Ring {
    slots: Vec<SlotState>,
    capacity: u64,
}

impl Ring {
    /// Allocate `capacity + 1` slots, all `Unknown`
    ///
    /// # Panics
    ///
    /// Panics if `capacity + 1` slots cannot be addressed on this platform.
    pub fn new(capacity: u64) -> Self {
        let len = usize::try_from(capacity)
            .ok()
            .and_then(|c| c.checked_add(1))
            .expect("ring capacity exceeds addressable memory");

        Self {
            slots: vec![SlotState::Unknown; len],
            capacity,
        }
    }

    /// Highest valid position
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of physical slots (`capacity + 1`)
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A ring always holds at least one slot
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, position: u64) -> bool {
        position <= self.capacity
    }

    /// State at `position`, `None` past capacity
    #[inline]
    pub fn get(&self, position: u64) -> Option<SlotState> {
        if self.contains(position) {
            Some(self.slots[position as usize])
        } else {
            None
        }
    }

    /// Overwrite one slot
    ///
    /// Returns false (and changes nothing) when `position` is past capacity.
    #[inline]
    pub fn set(&mut self, position: u64, state: SlotState) -> bool {
        if !self.contains(position) {
            return false;
        }
        self.slots[position as usize] = state;
        true
    }

    /// Overwrite every listed position that lies inside the ring
    pub fn mark(&mut self, positions: &[u64], state: SlotState) {
        for &position in positions {
            self.set(position, state);
        }
    }

    /// Overwrite `0..=end`, clamped to capacity
    pub fn fill_through(&mut self, end: u64, state: SlotState) {
        let end = end.min(self.capacity) as usize;
        self.slots[..=end].fill(state);
    }

    /// Reset every slot to `Unknown`
    pub fn clear(&mut self) {
        self.slots.fill(SlotState::Unknown);
    }

    /// Position after `position` in ring order
    #[inline]
    pub fn successor(&self, position: u64) -> u64 {
        if position >= self.capacity {
            0
        } else {
            position + 1
        }
    }

    /// Map a bound outside `0..=capacity` to 0
    #[inline]
    fn normalize(&self, bound: u64) -> u64 {
        if self.contains(bound) {
            bound
        } else {
            0
        }
    }

    /// Positions from `start` up to but excluding `end`, in ring order
    ///
    /// Bounds past capacity are normalized to 0. Equal bounds give an empty
    /// list; otherwise the walk wraps from capacity to 0 as needed, so
    /// `positions_between(capacity - 10, 10)` covers both ends of the ring.
    pub fn positions_between(&self, start: u64, end: u64) -> Vec<u64> {
        let start = self.normalize(start);
        let end = self.normalize(end);

        if start == end {
            return Vec::new();
        }

        let span = if end > start {
            end - start
        } else {
            self.capacity - start + 1 + end
        };

        let mut sliced = Vec::with_capacity(span as usize);
        let mut cursor = start;
        while cursor != end {
            sliced.push(cursor);
            cursor = self.successor(cursor);
        }

        sliced
    }

    /// Positions of [`positions_between`](Self::positions_between) that are
    /// still `Unknown`
    pub fn unknown_between(&self, start: u64, end: u64) -> Vec<u64> {
        let mut missing = self.positions_between(start, end);
        missing.retain(|&position| self.slots[position as usize].is_unknown());
        missing
    }
}
