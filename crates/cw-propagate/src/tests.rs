//! Unit tests for cw-propagate.

use cw_core::{TripId, TOLERANCE};
use cw_network::{Instance, InstanceBuilder};

use crate::{PropagateError, PropagateObserver, Propagator, PropagatorConfig, TripBounds};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Single shared arc (100 s, capacity 1, thresholds [1.0], slopes [0.5])
/// with one trip per `(release, deadline, max_staggering)` tuple.
fn single_arc_instance(trips: &[(f64, f64, f64)]) -> Instance {
    let mut b = InstanceBuilder::new();
    let arc = b.add_arc(100.0, 1);
    b.delay_pieces(&[1.0], &[0.5]);
    for &(release, deadline, max_staggering) in trips {
        b.add_trip(vec![arc], release, deadline, max_staggering);
    }
    b.build().unwrap()
}

fn converged(instance: &Instance) -> TripBounds {
    Propagator::default().run(instance).unwrap()
}

/// Bound invariants that must hold for every trip and position.
fn assert_invariants(instance: &Instance, bounds: &TripBounds) {
    for trip in instance.trips() {
        for (position, &arc) in trip.route.iter().enumerate() {
            let b = bounds.get(trip.id, position);
            assert!(
                b.earliest_departure <= b.latest_departure + TOLERANCE,
                "{} pos {position}: departure window inverted",
                trip.id
            );
            assert!(
                b.earliest_arrival <= b.latest_arrival + TOLERANCE,
                "{} pos {position}: arrival window inverted",
                trip.id
            );
            let expected = b.earliest_departure
                + b.min_delay
                + instance.network.travel_time(arc);
            assert_eq!(
                b.earliest_arrival, expected,
                "{} pos {position}: earliest arrival not ed + min_delay + travel",
                trip.id
            );
            assert!(b.max_delay >= b.min_delay);
        }
        let last = trip.route.len() - 1;
        assert_eq!(
            bounds.latest_arrival(trip.id, last),
            trip.deadline,
            "{}: latest arrival at sink must equal deadline",
            trip.id
        );
    }
}

// ── Scenario A: one trip, no contention ───────────────────────────────────────

#[cfg(test)]
mod scenario_a {
    use super::*;

    #[test]
    fn lone_trip_runs_free_flow() {
        let instance = single_arc_instance(&[(0.0, 500.0, 0.0)]);
        let bounds = converged(&instance);
        assert_invariants(&instance, &bounds);

        let b = bounds.get(TripId(0), 0);
        assert_eq!(b.earliest_departure, 0.0);
        assert_eq!(b.latest_departure, 0.0);
        assert_eq!(b.earliest_arrival, 100.0);
        assert_eq!(b.latest_arrival, 100.0);
        assert_eq!(b.min_delay, 0.0);
        assert_eq!(b.max_delay, 0.0);
    }
}

// ── Scenario B: two simultaneous trips on a capacity-1 arc ────────────────────

#[cfg(test)]
mod scenario_b {
    use super::*;

    fn instance() -> Instance {
        single_arc_instance(&[(0.0, 500.0, 0.0), (0.0, 500.0, 0.0)])
    }

    #[test]
    fn second_bound_trip_sees_min_delay() {
        let bounds = converged(&instance());
        // Ties pop by trip id, so trip 0 is bound first (free flow) and
        // trip 1 is bound with trip 0 certainly on the arc.
        assert_eq!(bounds.get(TripId(0), 0).min_delay, 0.0);
        assert!(bounds.get(TripId(1), 0).min_delay > 0.0);
    }

    #[test]
    fn exact_bounds() {
        let instance = instance();
        let bounds = converged(&instance);
        assert_invariants(&instance, &bounds);

        // delay(2) = 0.5 · (100/1) · (2 − 1) = 50.
        let first = bounds.get(TripId(0), 0);
        assert_eq!(first.earliest_arrival, 100.0);
        assert_eq!(first.latest_arrival, 150.0);
        assert_eq!(first.max_delay, 50.0);

        let second = bounds.get(TripId(1), 0);
        assert_eq!(second.min_delay, 50.0);
        assert_eq!(second.earliest_arrival, 150.0);
        assert_eq!(second.latest_arrival, 150.0);
    }

    #[test]
    fn converges_in_two_iterations() {
        let bounds = converged(&instance());
        assert_eq!(bounds.iterations(), 2);
    }
}

// ── Scenario C: disjoint windows never contend ────────────────────────────────

#[cfg(test)]
mod scenario_c {
    use super::*;

    #[test]
    fn late_release_sees_no_delay() {
        let instance = single_arc_instance(&[(0.0, 1000.0, 0.0), (800.0, 1000.0, 0.0)]);
        let bounds = converged(&instance);
        assert_invariants(&instance, &bounds);

        // Trip 0 is long gone (latest arrival 100) before trip 1 departs.
        assert_eq!(bounds.latest_arrival(TripId(0), 0), 100.0);
        let late = bounds.get(TripId(1), 0);
        assert_eq!(late.min_delay, 0.0);
        assert_eq!(late.max_delay, 0.0);
        assert_eq!(late.earliest_arrival, 900.0);
        assert_eq!(late.latest_arrival, 900.0);
    }
}

// ── Multi-arc chaining ────────────────────────────────────────────────────────

#[cfg(test)]
mod chaining {
    use super::*;

    #[test]
    fn arrival_feeds_next_departure() {
        let mut b = InstanceBuilder::new();
        let a1 = b.add_arc(100.0, 1);
        let a2 = b.add_arc(50.0, 1);
        b.delay_pieces(&[1.0], &[0.5]);
        b.add_trip(vec![a1, a2], 10.0, 1000.0, 0.0);
        let instance = b.build().unwrap();

        let bounds = converged(&instance);
        assert_invariants(&instance, &bounds);

        assert_eq!(bounds.earliest_arrival(TripId(0), 0), 110.0);
        assert_eq!(bounds.earliest_departure(TripId(0), 1), 110.0);
        assert_eq!(bounds.earliest_arrival(TripId(0), 1), 160.0);
        // Sink position departs at the route's completion time.
        assert_eq!(bounds.earliest_departure(TripId(0), 2), 160.0);
    }

    #[test]
    fn staggering_widens_departure_window() {
        let mut b = InstanceBuilder::new();
        let arc = b.add_arc(100.0, 1);
        b.delay_pieces(&[1.0], &[0.5]);
        b.add_trip(vec![arc], 0.0, 500.0, 30.0);
        let instance = b.build().unwrap();

        let bounds = converged(&instance);
        let first = bounds.get(TripId(0), 0);
        assert_eq!(first.earliest_departure, 0.0);
        assert_eq!(first.latest_departure, 30.0);
        assert!(first.latest_arrival >= 130.0);
    }
}

// ── Failure modes ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;

    #[test]
    fn infeasible_deadline_fails_before_propagation() {
        let mut instance = single_arc_instance(&[(0.0, 500.0, 0.0)]);
        // Free-flow completion is 100; cut the deadline below it after build.
        instance.trips[0].deadline = 50.0;
        let err = Propagator::default().run(&instance).unwrap_err();
        assert!(matches!(err, PropagateError::Instance(_)));
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        // Scenario B needs two outer iterations; cap at one.
        let instance = single_arc_instance(&[(0.0, 500.0, 0.0), (0.0, 500.0, 0.0)]);
        let propagator = Propagator::new(PropagatorConfig {
            max_iterations: 1,
            ..PropagatorConfig::default()
        });
        let err = propagator.run(&instance).unwrap_err();
        assert!(matches!(err, PropagateError::NonConvergence { iterations: 1 }));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changed_per_iteration: Vec<usize>,
        converged_after: Option<usize>,
    }

    impl PropagateObserver for Recorder {
        fn on_iteration(&mut self, _iteration: usize, changed: usize) {
            self.changed_per_iteration.push(changed);
        }
        fn on_converged(&mut self, iterations: usize) {
            self.converged_after = Some(iterations);
        }
    }

    #[test]
    fn reports_iterations_and_convergence() {
        let instance = single_arc_instance(&[(0.0, 500.0, 0.0), (0.0, 500.0, 0.0)]);
        let mut recorder = Recorder::default();
        Propagator::default()
            .run_observed(&instance, &mut recorder)
            .unwrap();

        assert_eq!(recorder.converged_after, Some(2));
        assert_eq!(recorder.changed_per_iteration.len(), 2);
        assert!(recorder.changed_per_iteration[0] > 0);
        assert_eq!(*recorder.changed_per_iteration.last().unwrap(), 0);
    }
}

// ── Randomized stress ─────────────────────────────────────────────────────────

#[cfg(test)]
mod stress {
    use super::*;
    use cw_network::generator::{generate, GeneratorConfig};

    /// Lightly congested settings: wide release span and generous slack so
    /// worst-case congestion stays within every deadline.
    fn light_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            trip_count: 40,
            capacity: (2, 4),
            release_span: 3_600.0,
            slack_factor: 3.0,
            max_staggering: 30.0,
            seed,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn generated_instances_converge_with_valid_bounds() {
        for seed in 0..3 {
            let config = light_config(seed);
            let instance = generate(&config).unwrap();
            let bounds = converged(&instance);
            assert_invariants(&instance, &bounds);
            assert!(bounds.iterations() <= PropagatorConfig::default().max_iterations);
        }
    }
}
