//! Arc parameters and the stable-index arc arena.
//!
//! # Data layout
//!
//! Arcs live in a flat `Vec<ArcParams>` indexed by `ArcId`.  Index 0 is the
//! reserved zero-cost sink arc that terminates every route.  Indices are
//! stable for the lifetime of an instance: conflict-set extraction *appends*
//! copies of an arc when it splits one into temporally disjoint contention
//! groups, it never removes or reorders existing entries.  Anything holding
//! an `ArcId` therefore stays valid across splitting.

use cw_core::ArcId;

// ── ArcParams ─────────────────────────────────────────────────────────────────

/// Physical parameters of one directed arc.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcParams {
    /// Free-flow traversal time in seconds.
    pub travel_time: f64,
    /// Nominal vehicle-count capacity; the PWL thresholds scale off this.
    pub capacity: u32,
}

impl ArcParams {
    /// Parameters of the reserved sink arc: zero cost, never congested.
    pub const SINK: ArcParams = ArcParams { travel_time: 0.0, capacity: 1 };
}

// ── Network ───────────────────────────────────────────────────────────────────

/// The arc arena.  Construct via [`InstanceBuilder`](crate::InstanceBuilder);
/// `Network::new()` starts with only the sink arc at index 0.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Network {
    arcs: Vec<ArcParams>,
}

impl Network {
    /// A network containing only the reserved sink arc.
    pub fn new() -> Self {
        Self { arcs: vec![ArcParams::SINK] }
    }

    /// Append an arc and return its id (sequential from 1; 0 is the sink).
    pub fn push(&mut self, params: ArcParams) -> ArcId {
        let id = ArcId(self.arcs.len() as u32);
        self.arcs.push(params);
        id
    }

    /// Append a copy of `arc` (same travel time and capacity) and return the
    /// copy's id.  Used when an arc splits into disjoint contention groups.
    pub fn push_copy(&mut self, arc: ArcId) -> ArcId {
        let params = self.arcs[arc.index()];
        self.push(params)
    }

    /// Total arc count, sink included.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// `true` if `arc` is a valid index into this network.
    #[inline]
    pub fn contains(&self, arc: ArcId) -> bool {
        arc.index() < self.arcs.len()
    }

    #[inline]
    pub fn params(&self, arc: ArcId) -> &ArcParams {
        &self.arcs[arc.index()]
    }

    /// Free-flow traversal time of `arc` in seconds.
    #[inline]
    pub fn travel_time(&self, arc: ArcId) -> f64 {
        self.arcs[arc.index()].travel_time
    }

    /// Nominal capacity of `arc`.
    #[inline]
    pub fn capacity(&self, arc: ArcId) -> u32 {
        self.arcs[arc.index()].capacity
    }

    /// Iterator over all non-sink arc ids.
    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> + '_ {
        (1..self.arcs.len()).map(|i| ArcId(i as u32))
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
