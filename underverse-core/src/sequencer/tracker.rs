//! Arrival-order tracking with gap detection
//!
//! The [`Sequencer`] never buffers messages. It keeps one [`SlotState`] per
//! ring position and a [`Cursor`] at the end of the confirmed prefix, and on
//! every arrival answers two questions:
//!
//! - did this id extend the confirmed prefix in order?
//! - which positions between the cursor and this id are still unknown?
//!
//! Unknown positions are announced to the fetch listeners, which report back
//! whether the data is being fetched (`Pending`) or has arrived (`Confirmed`).
//! A position that is `Pending` is never announced again.
//!
//! # Overflow
//!
//! Ids live in `0..=capacity`. When the cursor sits on `capacity` and `0`
//! arrives, the id space has wrapped: every slot is cleared and the lap
//! counter advances. [`Sequencer::reset`] advances it too. Requests raised
//! on an earlier lap are ignored by [`Sequencer::resolve`].
//!
//! # Threading
//!
//! Every mutation takes `&mut self`. Callers that feed one sequencer from
//! several producers must serialize access themselves (e.g. behind a mutex).
//!
//! # Example
//!
//! ```
//! use underverse_core::Sequencer;
//!
//! let mut seq = Sequencer::new(100);
//! seq.start();
//! seq.on_fetch(|fetch| {
//!     assert_eq!(fetch.missing(), &[2, 3]);
//!     fetch.mark_pending();
//! });
//!
//! assert!(seq.received(0));
//! assert!(seq.received(1));
//! assert!(!seq.received(4)); // 2 and 3 are missing
//! ```

use tracing::{debug, info, warn};

use super::notify::{Fetch, FetchListeners, FetchRequest, ListenerId};
use super::ring::Ring;
use super::stats::SequencerStats;
use crate::config::{SequencerConfig, DEFAULT_CAPACITY};
use crate::core::{ConfigError, Cursor, SlotState};

/// Ring-backed arrival tracker
#[derive(Debug)]
pub struct Sequencer {
    ring: Ring,
    cursor: Cursor,
    lap: u64,
    listeners: FetchListeners,
    stats: SequencerStats,
}

impl Sequencer {
    /// Create a sequencer over positions `0..=capacity`
    ///
    /// The cursor starts `Inactive`: arrivals are recorded but `received`
    /// returns false until [`start`](Self::start) or
    /// [`initialize`](Self::initialize) is called.
    pub fn new(capacity: u64) -> Self {
        Self {
            ring: Ring::new(capacity),
            cursor: Cursor::Inactive,
            lap: 0,
            listeners: FetchListeners::new(),
            stats: SequencerStats::default(),
        }
    }

    /// Create a sequencer whose prefix `0..=position` is already confirmed
    ///
    /// An out-of-range `position` leaves the cursor inactive.
    pub fn with_position(capacity: u64, position: u64) -> Self {
        let mut sequencer = Self::new(capacity);
        sequencer.initialize(position);
        sequencer
    }

    /// Build from configuration
    ///
    /// A negative `initial_cursor` starts the stream at its origin, a
    /// non-negative one seeds the prefix through that position.
    pub fn from_config(config: &SequencerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sequencer = Self::new(config.capacity);
        match config.initial_cursor {
            Some(cursor) if cursor < 0 => sequencer.start(),
            Some(cursor) => {
                sequencer.initialize(cursor as u64);
            }
            None => {}
        }

        Ok(sequencer)
    }

    /// Activate the cursor at the start of the stream
    ///
    /// The next in-order id is 0. No slot is touched.
    pub fn start(&mut self) {
        self.cursor = Cursor::Origin;
        debug!("sequencer started at stream origin");
    }

    /// Place the cursor at `position` and confirm `0..=position`
    ///
    /// Used when joining a stream mid-flight with known history. Returns
    /// false, changing nothing, when `position` is past capacity.
    pub fn initialize(&mut self, position: u64) -> bool {
        if !self.ring.contains(position) {
            warn!(
                position,
                capacity = self.ring.capacity(),
                "ignoring cursor outside the ring"
            );
            return false;
        }

        self.ring.fill_through(position, SlotState::Confirmed);
        self.cursor = Cursor::At(position);
        info!(position, "sequencer cursor initialized");
        true
    }

    /// Record an arrival
    ///
    /// The slot for `id` is confirmed whatever the outcome. Returns true
    /// only when `id` directly follows the cursor; the cursor then moves to
    /// `id`. Otherwise, if positions between the cursor and `id` are still
    /// unknown, one fetch event carrying them is delivered to every listener
    /// before this returns.
    ///
    /// Ids past capacity are ignored and return false.
    pub fn received(&mut self, id: u64) -> bool {
        if !self.ring.set(id, SlotState::Confirmed) {
            self.stats.rejected += 1;
            debug!(id, capacity = self.ring.capacity(), "rejected id past ring capacity");
            return false;
        }
        self.stats.received += 1;

        let Some(start) = self.cursor.following() else {
            return false;
        };

        if self.is_successor(id) {
            // Overflow clears the slot that was just confirmed
            self.ring.set(id, SlotState::Confirmed);
            self.cursor = Cursor::At(id);
            self.stats.in_order += 1;
            return true;
        }

        self.stats.out_of_order += 1;

        let missing = self.ring.unknown_between(start, id);
        if missing.is_empty() {
            // Everything in between is confirmed or already being fetched
            return false;
        }

        self.emit(missing);
        false
    }

    /// Whether `id` directly follows the cursor
    ///
    /// When the cursor is at capacity and `id` is 0 the id space has
    /// wrapped: the ring is cleared before this returns true.
    pub fn is_successor(&mut self, id: u64) -> bool {
        match self.cursor {
            Cursor::Inactive => false,
            Cursor::Origin => id == 0,
            Cursor::At(position) if position == self.ring.capacity() && id == 0 => {
                self.overflow();
                true
            }
            Cursor::At(position) => position.checked_add(1) == Some(id),
        }
    }

    fn overflow(&mut self) {
        self.ring.clear();
        self.lap += 1;
        self.stats.overflows += 1;
        info!(lap = self.lap, capacity = self.ring.capacity(), "sequencer ring overflowed");
    }

    fn emit(&mut self, missing: Vec<u64>) {
        self.stats.fetches_emitted += 1;
        self.stats.positions_requested += missing.len() as u64;

        debug!(
            count = missing.len(),
            first = missing.first().copied(),
            last = missing.last().copied(),
            lap = self.lap,
            "gap detected, requesting fetch"
        );

        let request = FetchRequest::new(missing, self.lap);
        self.listeners.dispatch(&request, &mut self.ring);
    }

    /// Apply a fetch outcome after the listener has returned
    ///
    /// `complete == false` marks the positions `Pending`, `true` marks them
    /// `Confirmed`. Requests from before the last overflow or reset are
    /// ignored and return false.
    ///
    /// Resolution is the caller's responsibility. A request that is never
    /// resolved leaves its positions unknown, and they will be requested
    /// again on the next out-of-order arrival past them.
    pub fn resolve(&mut self, request: &FetchRequest, complete: bool) -> bool {
        if request.lap() != self.lap {
            warn!(
                request_lap = request.lap(),
                lap = self.lap,
                "ignoring fetch resolution from an earlier lap"
            );
            return false;
        }

        self.ring
            .mark(request.missing(), SlotState::from_resolution(complete));
        true
    }

    /// Subscribe to every fetch event
    pub fn on_fetch<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Fetch<'_>) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Subscribe to the next fetch event only
    pub fn once_fetch<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Fetch<'_>) + Send + 'static,
    {
        self.listeners.subscribe_once(listener)
    }

    /// Unsubscribe; false if the listener was not registered
    pub fn off_fetch(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Positions from `start` up to but excluding `end`, in ring order
    ///
    /// See [`Ring::positions_between`].
    pub fn positions_between(&self, start: u64, end: u64) -> Vec<u64> {
        self.ring.positions_between(start, end)
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Confirmed cursor position, `None` before anything is confirmed
    #[inline]
    pub fn position(&self) -> Option<u64> {
        self.cursor.position()
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.ring.capacity()
    }

    /// State of one slot, `None` past capacity
    #[inline]
    pub fn slot(&self, position: u64) -> Option<SlotState> {
        self.ring.get(position)
    }

    /// Ring generation: advances on every overflow and every reset
    #[inline]
    pub fn lap(&self) -> u64 {
        self.lap
    }

    pub fn stats(&self) -> SequencerStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SequencerStats::default();
    }

    /// Forget all arrivals and deactivate the cursor
    ///
    /// Listeners and statistics are kept. The lap advances, so requests
    /// still in flight from before the reset cannot be resolved into the
    /// new stream.
    pub fn reset(&mut self) {
        self.ring.clear();
        self.cursor = Cursor::Inactive;
        self.lap += 1;
        debug!(lap = self.lap, "sequencer reset");
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
