//! Concrete schedules as supplied by external callers.

use cw_core::TripId;
use cw_network::Instance;

use crate::error::{ConflictError, ConflictResult};

/// A concrete schedule: one departure time per trip per route position,
/// sink position included.
///
/// The arrival at position `p` is by definition the departure at `p + 1`;
/// there is no separate arrival array to drift out of sync.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSchedule {
    departures: Vec<Vec<f64>>,
}

impl TripSchedule {
    pub fn new(departures: Vec<Vec<f64>>) -> Self {
        Self { departures }
    }

    pub fn trip_count(&self) -> usize {
        self.departures.len()
    }

    #[inline]
    pub fn departure(&self, trip: TripId, position: usize) -> f64 {
        self.departures[trip.index()][position]
    }

    /// Arrival at `position` = departure from the next position.  Undefined
    /// for the final (sink) position, which has no successor.
    #[inline]
    pub fn arrival(&self, trip: TripId, position: usize) -> f64 {
        self.departures[trip.index()][position + 1]
    }

    /// Check the schedule's shape against `instance` (one entry per trip,
    /// one slot per route position).
    pub fn validate_shape(&self, instance: &Instance) -> ConflictResult<()> {
        if self.departures.len() != instance.trips().len() {
            return Err(ConflictError::TripCountMismatch {
                expected: instance.trips().len(),
                got: self.departures.len(),
            });
        }
        for trip in instance.trips() {
            let got = self.departures[trip.id.index()].len();
            if got != trip.route.len() {
                return Err(ConflictError::PositionCountMismatch {
                    trip: trip.id,
                    expected: trip.route.len(),
                    got,
                });
            }
        }
        Ok(())
    }
}
