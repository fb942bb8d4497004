//! Instance assembly and validation.
//!
//! An [`Instance`] bundles the arc arena, the trip table, and the delay
//! model — everything the propagator and the conflict modules consume.  Do
//! not construct directly; use [`InstanceBuilder`], which appends the sink
//! position to every route and fail-fast validates the whole input so
//! invalid data never reaches the propagator.
//!
//! # Example
//!
//! ```
//! use cw_network::InstanceBuilder;
//!
//! let mut b = InstanceBuilder::new();
//! let arc = b.add_arc(100.0, 1);
//! b.add_trip(vec![arc], 0.0, 500.0, 0.0);
//! b.delay_pieces(&[1.0], &[0.5]);
//! let instance = b.build().unwrap();
//! assert_eq!(instance.trips().len(), 1);
//! assert_eq!(instance.trips()[0].route.len(), 2); // arc + sink
//! ```

use cw_core::{ArcId, TripId};

use crate::arc::{ArcParams, Network};
use crate::delay::DelayModel;
use crate::error::{NetworkError, NetworkResult};
use crate::trip::Trip;

// ── Instance ──────────────────────────────────────────────────────────────────

/// A validated propagation instance.
///
/// `network` and `trips` are mutable to the conflict-set extractor (arc
/// splitting appends arc copies and rewrites routes); everything else treats
/// an instance as read-only.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    pub network: Network,
    pub trips: Vec<Trip>,
    pub delay_model: DelayModel,
}

impl Instance {
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    #[inline]
    pub fn trip(&self, id: TripId) -> &Trip {
        &self.trips[id.index()]
    }

    /// Congestion delay for `n` vehicles on `arc`.  The sink arc is never
    /// congested and always returns zero.
    #[inline]
    pub fn delay(&self, arc: ArcId, n: u32) -> f64 {
        if arc.is_sink() {
            return 0.0;
        }
        self.delay_model.delay(self.network.params(arc), n)
    }

    /// Sum of free-flow travel times along `trip`'s route from `position`
    /// (inclusive) to the end.
    pub fn free_flow_remaining(&self, trip: TripId, position: usize) -> f64 {
        self.trips[trip.index()].route[position..]
            .iter()
            .map(|&a| self.network.travel_time(a))
            .sum()
    }

    /// Earliest possible completion time of `trip`: release time plus the
    /// free-flow traversal of its whole route.
    pub fn free_flow_completion(&self, trip: TripId) -> f64 {
        self.trips[trip.index()].release_time + self.free_flow_remaining(trip, 0)
    }

    /// Fail-fast consistency check: every trip's deadline must be reachable
    /// at free flow.  Called by the builder; exposed for callers that mutate
    /// trips afterwards.
    pub fn validate_deadlines(&self) -> NetworkResult<()> {
        for trip in &self.trips {
            let free_flow_completion = self.free_flow_completion(trip.id);
            if trip.deadline < free_flow_completion {
                return Err(NetworkError::InfeasibleDeadline {
                    trip: trip.id,
                    deadline: trip.deadline,
                    free_flow_completion,
                });
            }
        }
        Ok(())
    }
}

// ── InstanceBuilder ───────────────────────────────────────────────────────────

/// Accumulates arcs, trips, and the PWL configuration, then validates and
/// produces an [`Instance`].
pub struct InstanceBuilder {
    network: Network,
    trips: Vec<Trip>,
    threshold_fractions: Vec<f64>,
    slopes: Vec<f64>,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self {
            network: Network::new(),
            trips: Vec::new(),
            threshold_fractions: Vec::new(),
            slopes: Vec::new(),
        }
    }

    /// Add an arc and return its id (sequential from 1; 0 is the sink).
    pub fn add_arc(&mut self, travel_time: f64, capacity: u32) -> ArcId {
        self.network.push(ArcParams { travel_time, capacity })
    }

    /// Add a trip.  `route` lists the physical arcs only; the sink position
    /// is appended at build time.
    pub fn add_trip(
        &mut self,
        route: Vec<ArcId>,
        release_time: f64,
        deadline: f64,
        max_staggering: f64,
    ) -> TripId {
        let id = TripId(self.trips.len() as u32);
        self.trips.push(Trip { id, route, release_time, deadline, max_staggering });
        id
    }

    /// Set the shared `(threshold_fraction, slope)` lists.
    pub fn delay_pieces(&mut self, threshold_fractions: &[f64], slopes: &[f64]) {
        self.threshold_fractions = threshold_fractions.to_vec();
        self.slopes = slopes.to_vec();
    }

    /// Validate everything and produce the instance.
    pub fn build(self) -> NetworkResult<Instance> {
        let delay_model = DelayModel::new(&self.threshold_fractions, &self.slopes)?;

        for arc in self.network.arc_ids() {
            let params = self.network.params(arc);
            if !params.travel_time.is_finite() || params.travel_time < 0.0 {
                return Err(NetworkError::BadTravelTime {
                    arc,
                    travel_time: params.travel_time,
                });
            }
            if params.capacity == 0 {
                return Err(NetworkError::ZeroCapacity { arc });
            }
        }

        let mut trips = self.trips;
        for trip in &mut trips {
            if trip.route.is_empty() {
                return Err(NetworkError::EmptyRoute(trip.id));
            }
            for &arc in &trip.route {
                if arc.is_sink() {
                    return Err(NetworkError::SinkInRoute(trip.id));
                }
                if !self.network.contains(arc) {
                    return Err(NetworkError::UnknownArc { trip: trip.id, arc });
                }
            }
            if !trip.release_time.is_finite()
                || !trip.deadline.is_finite()
                || !trip.max_staggering.is_finite()
            {
                return Err(NetworkError::NonFiniteTime(trip.id));
            }
            if trip.max_staggering < 0.0 {
                return Err(NetworkError::NegativeStaggering(trip.id));
            }
            trip.route.push(ArcId::SINK);
        }

        let instance = Instance { network: self.network, trips, delay_model };
        instance.validate_deadlines()?;
        Ok(instance)
    }
}

impl Default for InstanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
