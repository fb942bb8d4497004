//! Unit tests for cw-conflict.

use cw_core::{ArcId, Tolerances, TripId};
use cw_network::{Instance, InstanceBuilder};
use cw_propagate::{Propagator, TripBounds};

use crate::{
    compute_conflict_binaries, extract_conflicting_sets, ConflictError, OrderRelation,
    TripSchedule,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Single shared arc (100 s, thresholds [1.0], slopes [0.5]) with the given
/// capacity and one trip per `(release, deadline)` pair (no staggering).
fn single_arc_instance(capacity: u32, trips: &[(f64, f64)]) -> Instance {
    let mut b = InstanceBuilder::new();
    let arc = b.add_arc(100.0, capacity);
    b.delay_pieces(&[1.0], &[0.5]);
    for &(release, deadline) in trips {
        b.add_trip(vec![arc], release, deadline, 0.0);
    }
    b.build().unwrap()
}

fn converged(instance: &Instance) -> TripBounds {
    Propagator::default().run(instance).unwrap()
}

// ── Conflicting-set extraction ────────────────────────────────────────────────

#[cfg(test)]
mod sets {
    use super::*;

    #[test]
    fn lone_trip_yields_empty_set() {
        let mut instance = single_arc_instance(1, &[(0.0, 500.0)]);
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);
        assert!(sets.get(ArcId(1)).is_empty());
        assert_eq!(sets.non_empty().count(), 0);
    }

    #[test]
    fn simultaneous_trips_conflict() {
        let mut instance = single_arc_instance(1, &[(0.0, 500.0), (0.0, 500.0)]);
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);
        assert_eq!(sets.get(ArcId(1)), &[TripId(0), TripId(1)]);
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        let mut instance = single_arc_instance(1, &[(0.0, 1000.0), (800.0, 1000.0)]);
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);
        assert!(sets.get(ArcId(1)).is_empty());
        // Two sub-capacity groups: no split either.
        assert_eq!(instance.network.arc_count(), 2);
    }

    #[test]
    fn group_within_capacity_is_discarded() {
        // Two overlapping trips on a capacity-2 arc: group size 2 does not
        // exceed max(1, 2 · 1.0) = 2.
        let mut instance = single_arc_instance(2, &[(0.0, 500.0), (0.0, 500.0)]);
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);
        assert!(sets.get(ArcId(1)).is_empty());
    }

    #[test]
    fn disjoint_conflicting_groups_split_the_arc() {
        let mut instance = single_arc_instance(
            1,
            &[(0.0, 500.0), (0.0, 500.0), (1000.0, 1500.0), (1000.0, 1500.0)],
        );
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);

        // Arena grew by one copy; the first group keeps the original arc.
        assert_eq!(instance.network.arc_count(), 3);
        assert_eq!(sets.arc_count(), 3);
        assert_eq!(sets.get(ArcId(1)), &[TripId(0), TripId(1)]);
        assert_eq!(sets.get(ArcId(2)), &[TripId(2), TripId(3)]);

        // The copy inherits the original's parameters.
        assert_eq!(instance.network.travel_time(ArcId(2)), 100.0);
        assert_eq!(instance.network.capacity(ArcId(2)), 1);

        // Later-group routes were rewritten; earlier ones untouched.
        assert_eq!(instance.trips()[0].route[0], ArcId(1));
        assert_eq!(instance.trips()[1].route[0], ArcId(1));
        assert_eq!(instance.trips()[2].route[0], ArcId(2));
        assert_eq!(instance.trips()[3].route[0], ArcId(2));
    }

    #[test]
    fn extraction_is_idempotent() {
        let mut instance = single_arc_instance(
            1,
            &[(0.0, 500.0), (0.0, 500.0), (1000.0, 1500.0), (1000.0, 1500.0)],
        );
        let bounds = converged(&instance);
        let first = extract_conflicting_sets(&mut instance, &bounds);
        let arcs_after_first = instance.network.arc_count();

        let second = extract_conflicting_sets(&mut instance, &bounds);
        assert_eq!(first, second);
        assert_eq!(instance.network.arc_count(), arcs_after_first);
    }
}

// ── Conflict binaries ─────────────────────────────────────────────────────────

#[cfg(test)]
mod binaries {
    use super::*;

    /// Two contending trips on one arc, with extraction already applied.
    fn contended_instance() -> (Instance, crate::ConflictingSets) {
        let mut instance = single_arc_instance(1, &[(0.0, 500.0), (0.0, 500.0)]);
        let bounds = converged(&instance);
        let sets = extract_conflicting_sets(&mut instance, &bounds);
        (instance, sets)
    }

    /// departure_A = 50, arrival_A = 150; departure_B = 10, arrival_B = 110.
    fn staggered_schedule() -> TripSchedule {
        TripSchedule::new(vec![vec![50.0, 150.0], vec![10.0, 110.0]])
    }

    #[test]
    fn strict_ordering() {
        let (instance, sets) = contended_instance();
        let binaries = compute_conflict_binaries(
            &instance,
            &sets,
            &staggered_schedule(),
            Tolerances::new(1e-6, 1e-3),
        )
        .unwrap();

        let (arc, a, b) = (ArcId(1), TripId(0), TripId(1));
        // A departs strictly after B.
        assert_eq!(binaries.alpha(arc, a, b), Some(OrderRelation::True));
        assert_eq!(binaries.beta(arc, a, b), Some(OrderRelation::True)); // B arrives at 110 > 50
        assert_eq!(binaries.gamma(arc, a, b), Some(OrderRelation::True));

        assert_eq!(binaries.alpha(arc, b, a), Some(OrderRelation::False));
        assert_eq!(binaries.beta(arc, b, a), Some(OrderRelation::True)); // A arrives at 150 > 10
        assert_eq!(binaries.gamma(arc, b, a), Some(OrderRelation::False));
    }

    #[test]
    fn numeric_encoding_matches_sentinels() {
        assert_eq!(OrderRelation::True.as_i8(), 1);
        assert_eq!(OrderRelation::False.as_i8(), 0);
        assert_eq!(OrderRelation::Undetermined.as_i8(), -1);
    }

    #[test]
    fn exact_tie_is_undetermined() {
        let (instance, sets) = contended_instance();
        // Both depart at 10.0: alpha ties in both directions.
        let schedule = TripSchedule::new(vec![vec![10.0, 110.0], vec![10.0, 110.0]]);
        let binaries =
            compute_conflict_binaries(&instance, &sets, &schedule, Tolerances::default()).unwrap();

        let (arc, a, b) = (ArcId(1), TripId(0), TripId(1));
        assert_eq!(binaries.alpha(arc, a, b), Some(OrderRelation::Undetermined));
        assert_eq!(binaries.alpha(arc, b, a), Some(OrderRelation::Undetermined));
        // Gamma inherits the tie instead of collapsing to False.
        assert!(binaries.gamma(arc, a, b).unwrap().is_undetermined());
    }

    #[test]
    fn tie_free_schedules_are_antisymmetric() {
        let (instance, sets) = contended_instance();
        let binaries = compute_conflict_binaries(
            &instance,
            &sets,
            &staggered_schedule(),
            Tolerances::default(),
        )
        .unwrap();

        let (arc, a, b) = (ArcId(1), TripId(0), TripId(1));
        let forward = binaries.alpha(arc, a, b).unwrap();
        let backward = binaries.alpha(arc, b, a).unwrap();
        assert_eq!(forward.as_i8() + backward.as_i8(), 1);

        // At most one trip can enter while the other is on the arc.
        let g_forward = binaries.gamma(arc, a, b).unwrap();
        let g_backward = binaries.gamma(arc, b, a).unwrap();
        assert!(!(g_forward == OrderRelation::True && g_backward == OrderRelation::True));
    }

    #[test]
    fn recomputation_is_pure() {
        let (instance, sets) = contended_instance();
        let schedule = staggered_schedule();
        let first =
            compute_conflict_binaries(&instance, &sets, &schedule, Tolerances::default()).unwrap();
        let second =
            compute_conflict_binaries(&instance, &sets, &schedule, Tolerances::default()).unwrap();
        assert_eq!(first.alpha, second.alpha);
        assert_eq!(first.beta, second.beta);
        assert_eq!(first.gamma, second.gamma);
    }

    #[test]
    fn malformed_schedule_is_rejected() {
        let (instance, sets) = contended_instance();

        let too_few_trips = TripSchedule::new(vec![vec![0.0, 100.0]]);
        assert!(matches!(
            compute_conflict_binaries(&instance, &sets, &too_few_trips, Tolerances::default()),
            Err(ConflictError::TripCountMismatch { expected: 2, got: 1 })
        ));

        let short_route = TripSchedule::new(vec![vec![0.0], vec![0.0, 100.0]]);
        assert!(matches!(
            compute_conflict_binaries(&instance, &sets, &short_route, Tolerances::default()),
            Err(ConflictError::PositionCountMismatch { trip: TripId(0), .. })
        ));
    }
}
