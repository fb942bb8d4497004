//! Pairwise temporal-order relations derived from a concrete schedule.
//!
//! For every contending pair `(i, j)` on every arc with a non-empty
//! conflicting set, three directional relations are derived:
//!
//! - `alpha[i][j]` — does `i` depart after `j`?
//! - `beta[i][j]`  — does `j` arrive after `i` departs (overlap can continue)?
//! - `gamma[i][j]` — both at once: `i` enters the arc while `j` is on it.
//!
//! Times closer than `CONSTR_TOLERANCE − TOLERANCE` are exact ties and come
//! back [`OrderRelation::Undetermined`] — a first-class value the optimizer
//! branches on (tied variables stay free and are warm-started), never a
//! boolean false.  Recomputed fresh for every candidate schedule; nothing is
//! cached here.

use rustc_hash::FxHashMap;

use cw_core::{ArcId, Tolerances, TripId};
use cw_network::Instance;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ConflictError, ConflictResult};
use crate::schedule::TripSchedule;
use crate::sets::ConflictingSets;

// ── OrderRelation ─────────────────────────────────────────────────────────────

/// A tri-state order relation.  `Undetermined` marks an exact tie and must
/// never be collapsed to `False`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderRelation {
    True,
    False,
    Undetermined,
}

impl OrderRelation {
    /// Legacy numeric encoding: `1`, `0`, and the tie sentinel `-1`.
    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            OrderRelation::True => 1,
            OrderRelation::False => 0,
            OrderRelation::Undetermined => -1,
        }
    }

    #[inline]
    pub fn is_undetermined(self) -> bool {
        self == OrderRelation::Undetermined
    }
}

// ── ConflictBinaries ──────────────────────────────────────────────────────────

type PairMap = FxHashMap<(TripId, TripId), OrderRelation>;

/// The three relation tables, keyed `arc → (i, j)`.  Only arcs with a
/// non-empty conflicting set appear; within such an arc, both directions of
/// every pair are present.
#[derive(Clone, Debug, Default)]
pub struct ConflictBinaries {
    pub alpha: FxHashMap<ArcId, PairMap>,
    pub beta: FxHashMap<ArcId, PairMap>,
    pub gamma: FxHashMap<ArcId, PairMap>,
}

impl ConflictBinaries {
    pub fn alpha(&self, arc: ArcId, i: TripId, j: TripId) -> Option<OrderRelation> {
        self.alpha.get(&arc)?.get(&(i, j)).copied()
    }

    pub fn beta(&self, arc: ArcId, i: TripId, j: TripId) -> Option<OrderRelation> {
        self.beta.get(&arc)?.get(&(i, j)).copied()
    }

    pub fn gamma(&self, arc: ArcId, i: TripId, j: TripId) -> Option<OrderRelation> {
        self.gamma.get(&arc)?.get(&(i, j)).copied()
    }
}

// ── Computation ───────────────────────────────────────────────────────────────

/// Derive the binaries for `schedule` over every contending pair.
///
/// Stateless and deterministic; call once per candidate schedule (status
/// quo, warm start, incumbent).
pub fn compute_conflict_binaries(
    instance: &Instance,
    sets: &ConflictingSets,
    schedule: &TripSchedule,
    tolerances: Tolerances,
) -> ConflictResult<ConflictBinaries> {
    schedule.validate_shape(instance)?;

    // Position of each trip on each arc it visits.
    let mut position: FxHashMap<(TripId, ArcId), usize> = FxHashMap::default();
    for trip in instance.trips() {
        for (p, &arc) in trip.route.iter().enumerate() {
            position.insert((trip.id, arc), p);
        }
    }

    let arcs: Vec<(ArcId, &[TripId])> = sets.non_empty().collect();

    let per_arc: Vec<ConflictResult<(ArcId, PairMap, PairMap, PairMap)>> = {
        let compute = |&(arc, set): &(ArcId, &[TripId])| {
            arc_binaries(arc, set, &position, schedule, tolerances)
        };

        #[cfg(feature = "parallel")]
        {
            arcs.par_iter().map(compute).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            arcs.iter().map(compute).collect()
        }
    };

    let mut binaries = ConflictBinaries::default();
    for result in per_arc {
        let (arc, alpha, beta, gamma) = result?;
        binaries.alpha.insert(arc, alpha);
        binaries.beta.insert(arc, beta);
        binaries.gamma.insert(arc, gamma);
    }
    Ok(binaries)
}

/// All pairwise relations on one arc.
fn arc_binaries(
    arc: ArcId,
    set: &[TripId],
    position: &FxHashMap<(TripId, ArcId), usize>,
    schedule: &TripSchedule,
    tolerances: Tolerances,
) -> ConflictResult<(ArcId, PairMap, PairMap, PairMap)> {
    let tie = tolerances.tie_threshold();
    let mut alpha = PairMap::default();
    let mut beta = PairMap::default();
    let mut gamma = PairMap::default();

    let lookup = |trip: TripId| -> ConflictResult<(f64, f64)> {
        let p = *position
            .get(&(trip, arc))
            .ok_or(ConflictError::MissingVisit { trip, arc })?;
        Ok((schedule.departure(trip, p), schedule.arrival(trip, p)))
    };

    for (a, &i) in set.iter().enumerate() {
        let (departure_i, arrival_i) = lookup(i)?;
        for &j in &set[a + 1..] {
            let (departure_j, arrival_j) = lookup(j)?;
            // Both directions, each tie-tested independently.
            for (from, to, departure, arrival_other) in [
                (i, j, departure_i, arrival_j),
                (j, i, departure_j, arrival_i),
            ] {
                let departure_other = if from == i { departure_j } else { departure_i };

                let a_rel = if (departure - departure_other).abs() < tie {
                    OrderRelation::Undetermined
                } else if departure >= departure_other + tie {
                    OrderRelation::True
                } else {
                    OrderRelation::False
                };

                let b_rel = if (departure - arrival_other).abs() < tie {
                    OrderRelation::Undetermined
                } else if arrival_other > departure {
                    OrderRelation::True
                } else {
                    OrderRelation::False
                };

                let g_rel = if a_rel.is_undetermined() || b_rel.is_undetermined() {
                    OrderRelation::Undetermined
                } else if a_rel == OrderRelation::True && b_rel == OrderRelation::True {
                    OrderRelation::True
                } else {
                    OrderRelation::False
                };

                alpha.insert((from, to), a_rel);
                beta.insert((from, to), b_rel);
                gamma.insert((from, to), g_rel);
            }
        }
    }

    Ok((arc, alpha, beta, gamma))
}
