//! Converged per-trip-per-position time bounds.

use cw_core::TripId;

// ── TimeBound ─────────────────────────────────────────────────────────────────

/// The time window of one trip at one route position.
///
/// Invariants on a converged table (`eps` = the propagator's tolerance):
///
/// - `earliest_arrival == earliest_departure + min_delay + travel_time(arc)`
/// - `latest_departure >= earliest_departure - eps`
/// - `latest_arrival   >= earliest_arrival   - eps`
/// - at the final (sink) position, `latest_arrival == deadline`
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBound {
    pub earliest_departure: f64,
    pub latest_departure: f64,
    pub earliest_arrival: f64,
    pub latest_arrival: f64,
    /// Smallest congestion delay the visit can incur.
    pub min_delay: f64,
    /// Largest congestion delay observed across the pessimistic sweep.
    pub max_delay: f64,
}

// ── TripBounds ────────────────────────────────────────────────────────────────

/// The converged bound table: one [`TimeBound`] per trip per route position.
///
/// Only the final fixed-point table is exposed; intermediate per-iteration
/// bounds are produced and discarded inside the propagator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripBounds {
    bounds: Vec<Vec<TimeBound>>,
    iterations: usize,
}

impl TripBounds {
    pub(crate) fn new(bounds: Vec<Vec<TimeBound>>, iterations: usize) -> Self {
        Self { bounds, iterations }
    }

    /// Number of outer fixed-point iterations it took to converge.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn trip_count(&self) -> usize {
        self.bounds.len()
    }

    /// Route length (sink included) of `trip`.
    pub fn position_count(&self, trip: TripId) -> usize {
        self.bounds[trip.index()].len()
    }

    #[inline]
    pub fn get(&self, trip: TripId, position: usize) -> &TimeBound {
        &self.bounds[trip.index()][position]
    }

    /// All bounds of one trip in route order.
    pub fn trip(&self, trip: TripId) -> &[TimeBound] {
        &self.bounds[trip.index()]
    }

    pub fn earliest_departure(&self, trip: TripId, position: usize) -> f64 {
        self.get(trip, position).earliest_departure
    }

    pub fn latest_departure(&self, trip: TripId, position: usize) -> f64 {
        self.get(trip, position).latest_departure
    }

    pub fn earliest_arrival(&self, trip: TripId, position: usize) -> f64 {
        self.get(trip, position).earliest_arrival
    }

    pub fn latest_arrival(&self, trip: TripId, position: usize) -> f64 {
        self.get(trip, position).latest_arrival
    }
}
