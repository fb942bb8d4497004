//! Trip definition.

use cw_core::{ArcId, TripId};

/// One routed trip through the arc network.
///
/// The route always ends at [`ArcId::SINK`]; the builder appends it, callers
/// supply only the physical arcs.  Positions within the route are the unit of
/// all per-trip bound arrays downstream.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub id: TripId,

    /// Ordered arc ids, terminated by the sink arc.
    pub route: Vec<ArcId>,

    /// Earliest time the trip may depart onto its first arc.
    pub release_time: f64,

    /// Hard completion deadline: the latest arrival at the sink.
    pub deadline: f64,

    /// Upper bound on how far the first departure may be delayed beyond
    /// `release_time`.
    pub max_staggering: f64,
}

impl Trip {
    /// Number of route positions, sink included.
    #[inline]
    pub fn len(&self) -> usize {
        self.route.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// Arc occupied at `position`.
    #[inline]
    pub fn arc_at(&self, position: usize) -> ArcId {
        self.route[position]
    }

    /// `true` if `position` is the final (sink) position.
    #[inline]
    pub fn is_last(&self, position: usize) -> bool {
        position + 1 == self.route.len()
    }
}
