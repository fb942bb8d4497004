//! Value-type departure events for the propagation sweep.

use std::cmp::Ordering;

use cw_core::TripId;

/// One queued "trip is ready to depart onto its `position`-th arc" event.
///
/// The heap holds at most one event per trip: position 0 seeds the sweep and
/// each processed event enqueues the same trip's next position.  Events are
/// plain values; the authoritative earliest-departure table lives in the
/// propagator and is updated *before* the next event is enqueued, so a popped
/// event is never stale.
#[derive(Copy, Clone, Debug)]
pub(crate) struct DepartureEvent {
    pub time: f64,
    pub trip: TripId,
    pub position: usize,
}

impl PartialEq for DepartureEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepartureEvent {}

impl PartialOrd for DepartureEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepartureEvent {
    /// Time-ordered; ties broken by trip id ascending for determinism.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.trip.cmp(&other.trip))
            .then_with(|| self.position.cmp(&other.position))
    }
}
