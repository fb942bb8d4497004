//! Conflicting-set extraction and arc splitting.
//!
//! # Algorithm
//!
//! Per arc, independently: sort the arc's visits by earliest departure and
//! walk them keeping the maximum latest arrival seen.  A visit that departs
//! at or after that maximum cannot overlap anything before it, so the
//! current group closes and a new one starts.  A closed group becomes a
//! conflicting set only if it is large enough to exceed the arc's zero-delay
//! vehicle count; smaller groups can never violate capacity and are
//! discarded.
//!
//! When one arc carries several conflicting sets they are temporally
//! disjoint, so the arc is split: the first set keeps the original arc id
//! and every later set gets a freshly appended copy, with the member trips'
//! routes rewritten to the copy.  Indices in the arena are stable — splitting
//! only appends — and route rewriting builds new route arrays rather than
//! editing them mid-walk.

use cw_core::{ArcId, TripId};
use cw_network::Instance;
use cw_propagate::TripBounds;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Floor on the conflicting-set size filter: a group must be strictly larger
/// than `max(MIN_SET_CAPACITY, capacity × threshold_fraction[0])` to count.
pub const MIN_SET_CAPACITY: u32 = 1;

// ── ConflictingSets ───────────────────────────────────────────────────────────

/// Per-arc conflicting sets, indexed by `ArcId` over the post-split arena.
/// An empty entry means the arc can never be contended.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConflictingSets {
    by_arc: Vec<Vec<TripId>>,
}

impl ConflictingSets {
    /// The conflicting set of `arc` (sorted by trip id; empty if none).
    #[inline]
    pub fn get(&self, arc: ArcId) -> &[TripId] {
        &self.by_arc[arc.index()]
    }

    /// Total arc count, post-split arena.
    pub fn arc_count(&self) -> usize {
        self.by_arc.len()
    }

    /// Iterator over `(arc, set)` for arcs with a non-empty set.
    pub fn non_empty(&self) -> impl Iterator<Item = (ArcId, &[TripId])> + '_ {
        self.by_arc
            .iter()
            .enumerate()
            .filter(|(_, set)| !set.is_empty())
            .map(|(i, set)| (ArcId(i as u32), set.as_slice()))
    }
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// One trip's visit to an arc, with its converged window.
#[derive(Copy, Clone, Debug)]
struct Visit {
    trip: TripId,
    position: usize,
    earliest_departure: f64,
    latest_arrival: f64,
}

/// Extract all conflicting sets from a converged bound table, splitting arcs
/// with multiple disjoint sets.  Mutates `instance`: the arena grows by one
/// copy per extra set and member routes are rewritten to the copies.
pub fn extract_conflicting_sets(instance: &mut Instance, bounds: &TripBounds) -> ConflictingSets {
    // ── Collect per-arc visit lists (sink never conflicts) ────────────────
    let mut visits: Vec<Vec<Visit>> = vec![Vec::new(); instance.network.arc_count()];
    for trip in instance.trips() {
        for (position, &arc) in trip.route.iter().enumerate() {
            if arc.is_sink() {
                continue;
            }
            let b = bounds.get(trip.id, position);
            visits[arc.index()].push(Visit {
                trip: trip.id,
                position,
                earliest_departure: b.earliest_departure,
                latest_arrival: b.latest_arrival,
            });
        }
    }

    // ── Group and filter, independently per arc ───────────────────────────
    let threshold_fraction = instance.delay_model.first_threshold_fraction();
    let conflicting_per_arc: Vec<Vec<Vec<Visit>>> = {
        let network = &instance.network;
        let group = |(i, arc_visits): (usize, &Vec<Visit>)| -> Vec<Vec<Visit>> {
            let capacity = network.capacity(ArcId(i as u32));
            let cutoff = f64::from(MIN_SET_CAPACITY).max(f64::from(capacity) * threshold_fraction);
            overlap_groups(arc_visits)
                .into_iter()
                .filter(|g| g.len() as f64 > cutoff)
                .collect()
        };

        #[cfg(feature = "parallel")]
        {
            visits.par_iter().enumerate().map(group).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            visits.iter().enumerate().map(group).collect()
        }
    };

    // ── Split arcs with more than one set; rewrite member routes ──────────
    //
    // Sequential: appends to the arena and writes fresh route arrays.  The
    // grouping above is already done, so nothing reads the routes mid-edit.
    let mut new_routes: Vec<Vec<ArcId>> =
        instance.trips().iter().map(|t| t.route.clone()).collect();
    let mut by_arc: Vec<Vec<TripId>> = vec![Vec::new(); instance.network.arc_count()];

    for (i, sets) in conflicting_per_arc.into_iter().enumerate() {
        let arc = ArcId(i as u32);
        for (nth, set) in sets.into_iter().enumerate() {
            let target = if nth == 0 {
                arc
            } else {
                let copy = instance.network.push_copy(arc);
                for visit in &set {
                    new_routes[visit.trip.index()][visit.position] = copy;
                }
                by_arc.push(Vec::new());
                copy
            };
            let mut members: Vec<TripId> = set.iter().map(|v| v.trip).collect();
            members.sort_unstable();
            by_arc[target.index()] = members;
        }
    }

    for (trip, route) in instance.trips.iter_mut().zip(new_routes) {
        trip.route = route;
    }

    ConflictingSets { by_arc }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Partition one arc's visits into maximal temporally overlapping groups.
fn overlap_groups(arc_visits: &[Visit]) -> Vec<Vec<Visit>> {
    let mut sorted = arc_visits.to_vec();
    sorted.sort_by(|a, b| {
        a.earliest_departure
            .total_cmp(&b.earliest_departure)
            .then(a.trip.cmp(&b.trip))
    });

    let mut groups: Vec<Vec<Visit>> = Vec::new();
    let mut current: Vec<Visit> = Vec::new();
    let mut max_latest_arrival = f64::NEG_INFINITY;

    for visit in sorted {
        if !current.is_empty() && visit.earliest_departure >= max_latest_arrival {
            groups.push(std::mem::take(&mut current));
            max_latest_arrival = f64::NEG_INFINITY;
        }
        max_latest_arrival = max_latest_arrival.max(visit.latest_arrival);
        current.push(visit);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
