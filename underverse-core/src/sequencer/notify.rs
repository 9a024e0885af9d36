//! Fetch notifications
//!
//! When an arrival leaves unknown positions behind the cursor, the sequencer
//! raises one fetch event. Every subscribed listener receives a [`Fetch`]
//! view synchronously, before `received` returns. A listener either resolves
//! the positions on the spot or keeps the owned [`FetchRequest`] and hands it
//! back to [`Sequencer::resolve`](super::Sequencer::resolve) later.
//!
//! A request that is never resolved leaves its positions `Unknown` (or
//! `Pending`) for good. Nothing times it out; that is the caller's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ring::Ring;
use crate::core::SlotState;

/// Gap positions reported by one fetch event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    missing: Vec<u64>,
    lap: u64,
}

impl FetchRequest {
    pub(crate) fn new(missing: Vec<u64>, lap: u64) -> Self {
        Self { missing, lap }
    }

    /// Missing positions in ring order
    #[inline]
    pub fn missing(&self) -> &[u64] {
        &self.missing
    }

    /// Ring lap the request was raised on
    #[inline]
    pub fn lap(&self) -> u64 {
        self.lap
    }
}

/// Listener's view of a fetch event while it is being delivered
///
/// Holds the ring mutably, so marking here takes effect immediately.
pub struct Fetch<'a> {
    request: &'a FetchRequest,
    ring: &'a mut Ring,
}

impl<'a> Fetch<'a> {
    pub(crate) fn new(request: &'a FetchRequest, ring: &'a mut Ring) -> Self {
        Self { request, ring }
    }

    /// Missing positions in ring order
    #[inline]
    pub fn missing(&self) -> &[u64] {
        self.request.missing()
    }

    /// Owned copy for resolving after the listener returns
    pub fn request(&self) -> FetchRequest {
        self.request.clone()
    }

    /// Resolve every missing position: `Pending` unless `complete`
    pub fn mark(&mut self, complete: bool) {
        self.ring
            .mark(self.request.missing(), SlotState::from_resolution(complete));
    }

    /// Record that a fetch for the missing positions is underway
    pub fn mark_pending(&mut self) {
        self.mark(false);
    }

    /// Record that the missing positions have been fetched
    pub fn mark_complete(&mut self) {
        self.mark(true);
    }

    /// Current state of any ring position
    pub fn state(&self, position: u64) -> Option<SlotState> {
        self.ring.get(position)
    }
}

/// Handle returned by subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type FetchCallback = Box<dyn FnMut(&mut Fetch<'_>) + Send>;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: FetchCallback,
}

/// Subscribers to the "fetch" event, in registration order
#[derive(Default)]
pub struct FetchListeners {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl FetchListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every fetch event
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&mut Fetch<'_>) + Send + 'static,
    {
        self.push(Box::new(callback), false)
    }

    /// Register a listener that is dropped after its first event
    pub fn subscribe_once<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&mut Fetch<'_>) + Send + 'static,
    {
        self.push(Box::new(callback), true)
    }

    fn push(&mut self, callback: FetchCallback, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, once, callback });
        id
    }

    /// Remove a listener; false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver one event to every listener, then drop the one-shot ones
    pub(crate) fn dispatch(&mut self, request: &FetchRequest, ring: &mut Ring) {
        for listener in &mut self.listeners {
            let mut fetch = Fetch::new(request, &mut *ring);
            (listener.callback)(&mut fetch);
        }
        self.listeners.retain(|listener| !listener.once);
    }
}

impl fmt::Debug for FetchListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchListeners")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
