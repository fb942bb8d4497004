//! The fixed-point propagation engine.
//!
//! # Structure
//!
//! Two nested loops:
//!
//! - **Outer loop**: iterate single sweeps until the latest-arrival table
//!   stops changing (exact equality — the sweep is deterministic, so a
//!   repeated input reproduces the output bit for bit), or the configured
//!   iteration cap is exceeded.  Latest arrivals start at the backward
//!   free-flow propagation of each deadline and can only tighten (the sweep
//!   caps every new bound by the previous one), so the loop is a monotone
//!   descent towards the fixed point.
//! - **Inner sweep**: an event-driven pass over all trip-position departure
//!   events in time order.  Strictly sequential: each popped event reads
//!   arc-local state written by earlier events, and propagating a trip's
//!   minimum delay mutates its *own* downstream departure estimates before
//!   they are enqueued.
//!
//! The sweep never mutates queued heap entries.  The heap holds one event
//! per trip (position 0 seeds it, step 9 chains the next position), and the
//! authoritative earliest-departure table is updated before the enqueue, so
//! popped events are always current.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cw_core::{ArcId, TripId, TOLERANCE};
use cw_network::Instance;

use crate::bounds::{TimeBound, TripBounds};
use crate::error::{PropagateError, PropagateResult};
use crate::event::DepartureEvent;
use crate::observer::{NoopObserver, PropagateObserver};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Propagator tuning knobs.
#[derive(Copy, Clone, Debug)]
pub struct PropagatorConfig {
    /// Outer-loop cap.  Convergence is expected well before this; exceeding
    /// it returns [`PropagateError::NonConvergence`].
    pub max_iterations: usize,

    /// Floating-point slack for bound validation and delay significance.
    pub eps: f64,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self { max_iterations: 50, eps: TOLERANCE }
    }
}

// ── Propagator ────────────────────────────────────────────────────────────────

/// The time-window propagation engine.  Stateless between runs; all working
/// state lives on the stack of [`run`](Self::run).
pub struct Propagator {
    pub config: PropagatorConfig,
}

impl Propagator {
    pub fn new(config: PropagatorConfig) -> Self {
        Self { config }
    }

    /// Run to the fixed point and return the converged bound table.
    pub fn run(&self, instance: &Instance) -> PropagateResult<TripBounds> {
        self.run_observed(instance, &mut NoopObserver)
    }

    /// Like [`run`](Self::run), with per-iteration observer callbacks.
    pub fn run_observed<O: PropagateObserver>(
        &self,
        instance: &Instance,
        observer: &mut O,
    ) -> PropagateResult<TripBounds> {
        // Fail fast on inconsistent instances before any propagation.
        instance.validate_deadlines()?;

        // ── Outer fixed-point loop ────────────────────────────────────────
        //
        // known_latest_arrival[trip][pos] seeds each sweep's pessimistic
        // bounds.  Initialized by pushing each deadline backward through the
        // trip's free-flow schedule.
        let mut known_latest_arrival = initial_latest_arrivals(instance);

        for iteration in 0..self.config.max_iterations {
            let bounds = self.sweep(instance, &known_latest_arrival)?;

            let new_latest_arrival: Vec<Vec<f64>> = bounds
                .iter()
                .map(|trip| trip.iter().map(|b| b.latest_arrival).collect())
                .collect();

            let changed = count_changed(&known_latest_arrival, &new_latest_arrival);
            observer.on_iteration(iteration, changed);

            if new_latest_arrival == known_latest_arrival {
                observer.on_converged(iteration + 1);
                return Ok(TripBounds::new(bounds, iteration + 1));
            }
            known_latest_arrival = new_latest_arrival;
        }

        Err(PropagateError::NonConvergence { iterations: self.config.max_iterations })
    }

    // ── Inner sweep ───────────────────────────────────────────────────────

    /// One deterministic pass producing a full bound table from the current
    /// latest-arrival seeds.
    fn sweep(
        &self,
        instance: &Instance,
        known_latest_arrival: &[Vec<f64>],
    ) -> PropagateResult<Vec<Vec<TimeBound>>> {
        let eps = self.config.eps;
        let trips = instance.trips();

        // ── Step 1: seed per-trip departure estimates and arc-local lists ─
        //
        // `earliest[t][p]` is the authoritative earliest-departure estimate:
        // a forward free-flow walk from each release time, later pushed
        // forward in place as minimum delays are discovered (step 6).
        let mut earliest: Vec<Vec<f64>> = trips
            .iter()
            .map(|trip| {
                let mut walk = Vec::with_capacity(trip.len());
                let mut t = trip.release_time;
                for &arc in &trip.route {
                    walk.push(t);
                    t += instance.network.travel_time(arc);
                }
                walk
            })
            .collect();

        // Arc-local visit lists (sink excluded — it never contends), ordered
        // by (seed departure, trip id) for deterministic tie-break.
        let mut arc_visits: Vec<Vec<(TripId, usize)>> =
            vec![Vec::new(); instance.network.arc_count()];
        for trip in trips {
            for (position, &arc) in trip.route.iter().enumerate() {
                if !arc.is_sink() {
                    arc_visits[arc.index()].push((trip.id, position));
                }
            }
        }
        for visits in &mut arc_visits {
            visits.sort_by(|&(ta, pa), &(tb, pb)| {
                earliest[ta.index()][pa]
                    .total_cmp(&earliest[tb.index()][pb])
                    .then(ta.cmp(&tb))
            });
        }

        let mut processed: Vec<Vec<bool>> =
            trips.iter().map(|t| vec![false; t.len()]).collect();
        let mut ledger: Vec<Vec<RecordedArrival>> =
            vec![Vec::new(); instance.network.arc_count()];
        let mut bounds: Vec<Vec<TimeBound>> = trips
            .iter()
            .map(|t| vec![TimeBound::default(); t.len()])
            .collect();

        let mut heap: BinaryHeap<Reverse<DepartureEvent>> = trips
            .iter()
            .map(|trip| {
                Reverse(DepartureEvent {
                    time: earliest[trip.id.index()][0],
                    trip: trip.id,
                    position: 0,
                })
            })
            .collect();

        // ── Steps 2–9: event loop ─────────────────────────────────────────
        while let Some(Reverse(event)) = heap.pop() {
            let trip = &trips[event.trip.index()];
            let t = event.trip.index();
            let position = event.position;
            let arc = trip.route[position];
            let earliest_departure = earliest[t][position];

            // Step 3: latest departure.
            let latest_departure = if position == 0 {
                earliest_departure + trip.max_staggering
            } else {
                bounds[t][position - 1].latest_arrival
            };
            if latest_departure < earliest_departure - eps {
                return Err(PropagateError::DepartureBoundViolation {
                    trip: trip.id,
                    position,
                    earliest_departure,
                    latest_departure,
                });
            }

            // The sink is never congested: the window closes at the seeded
            // latest arrival (the deadline at the final position).
            if arc.is_sink() {
                let latest_arrival = known_latest_arrival[t][position];
                if latest_arrival < earliest_departure - eps {
                    return Err(PropagateError::ArrivalBoundViolation {
                        trip: trip.id,
                        position,
                        earliest_arrival: earliest_departure,
                        latest_arrival,
                    });
                }
                bounds[t][position] = TimeBound {
                    earliest_departure,
                    latest_departure,
                    earliest_arrival: earliest_departure,
                    latest_arrival,
                    min_delay: 0.0,
                    max_delay: 0.0,
                };
                processed[t][position] = true;
                continue;
            }

            let travel_time = instance.network.travel_time(arc);

            // ── Step 4: gather conflicting arrivals and departures ────────
            let arrivals: Vec<&RecordedArrival> = ledger[arc.index()]
                .iter()
                .filter(|r| r.latest_arrival > earliest_departure)
                .collect();

            let mut departures: Vec<ConflictingDeparture> = Vec::new();
            for &(other, other_position) in &arc_visits[arc.index()] {
                if other == trip.id || processed[other.index()][other_position] {
                    continue;
                }
                let other_departure = earliest[other.index()][other_position];
                if other_departure < earliest_departure || other_departure > latest_departure {
                    continue;
                }
                let other_latest_departure = if other_position == 0 {
                    other_departure + trips[other.index()].max_staggering
                } else {
                    known_latest_arrival[other.index()][other_position - 1]
                };
                departures.push(ConflictingDeparture {
                    earliest_departure: other_departure,
                    latest_departure: other_latest_departure,
                    latest_arrival: known_latest_arrival[other.index()][other_position],
                });
            }

            // ── Step 5: optimistic bound ──────────────────────────────────
            //
            // Vehicles provably on the arc for E's whole departure window:
            // entered no later than E can enter (ties count — simultaneous
            // releases must see each other) and cannot have left before E's
            // latest departure.
            let mut min_vehicles: u32 = 1;
            for arrival in &arrivals {
                if arrival.latest_departure <= earliest_departure + eps
                    && latest_departure < arrival.earliest_arrival
                {
                    min_vehicles += 1;
                }
            }
            let zero_delay_count = instance.delay_model.first_threshold_fraction()
                * f64::from(instance.network.capacity(arc));
            let min_delay = if f64::from(min_vehicles) > zero_delay_count {
                instance.delay(arc, min_vehicles)
            } else {
                0.0
            };
            let earliest_arrival = earliest_departure + min_delay + travel_time;

            // ── Step 6: push the delay through the trip's own tail ────────
            if min_delay > eps {
                for p in position + 1..trip.len() {
                    earliest[t][p] += min_delay;
                }
            }
            // Re-derive the successor estimate from earliest_arrival so the
            // chained heap key and the table agree exactly.
            if position + 1 < trip.len() {
                earliest[t][position + 1] = earliest_arrival;
            }

            // ── Step 7: pessimistic bound ─────────────────────────────────
            let (latest_arrival_raw, max_delay) = pessimistic_arrival(
                instance,
                arc,
                earliest_departure,
                latest_departure,
                travel_time,
                &arrivals,
                &departures,
            );
            // Bounds only tighten across outer iterations.
            let latest_arrival = latest_arrival_raw.min(known_latest_arrival[t][position]);

            // ── Step 8: record and validate ───────────────────────────────
            if latest_arrival < earliest_arrival - eps {
                return Err(PropagateError::ArrivalBoundViolation {
                    trip: trip.id,
                    position,
                    earliest_arrival,
                    latest_arrival,
                });
            }
            bounds[t][position] = TimeBound {
                earliest_departure,
                latest_departure,
                earliest_arrival,
                latest_arrival,
                min_delay,
                max_delay,
            };
            processed[t][position] = true;
            ledger[arc.index()].push(RecordedArrival {
                latest_departure,
                earliest_arrival,
                latest_arrival,
            });

            // ── Step 9: chain the next position ───────────────────────────
            heap.push(Reverse(DepartureEvent {
                time: earliest_arrival,
                trip: trip.id,
                position: position + 1,
            }));
        }

        Ok(bounds)
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::new(PropagatorConfig::default())
    }
}

// ── Sweep-local records ───────────────────────────────────────────────────────

/// A bound already recorded on an arc during the current sweep.
#[derive(Clone)]
struct RecordedArrival {
    latest_departure: f64,
    earliest_arrival: f64,
    latest_arrival: f64,
}

/// A not-yet-processed departure on the same arc that falls inside the
/// current event's departure window.
struct ConflictingDeparture {
    earliest_departure: f64,
    latest_departure: f64,
    latest_arrival: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Backward free-flow propagation of every deadline: the final position gets
/// the deadline itself, earlier positions the deadline minus the free-flow
/// time still ahead of them.
fn initial_latest_arrivals(instance: &Instance) -> Vec<Vec<f64>> {
    instance
        .trips()
        .iter()
        .map(|trip| {
            let mut latest = vec![0.0; trip.len()];
            let mut remaining = 0.0;
            for position in (0..trip.len()).rev() {
                latest[position] = trip.deadline - remaining;
                remaining += instance.network.travel_time(trip.route[position]);
            }
            latest
        })
        .collect()
}

fn count_changed(known: &[Vec<f64>], new: &[Vec<f64>]) -> usize {
    known
        .iter()
        .zip(new)
        .flat_map(|(k, n)| k.iter().zip(n))
        .filter(|(k, n)| k != n)
        .count()
}

/// Event kinds of the pessimistic sweep.  Numeric order is the processing
/// order at equal timestamps: increments first, then decrements, then the
/// synthetic window boundary — the peak vehicle count is never missed.
const KIND_DEPARTURE: u8 = 0;
const KIND_ARRIVAL: u8 = 1;
const KIND_BOUNDARY: u8 = 2;

/// Step 7: merge conflicting arrivals and departures into one time-ordered
/// list, sweep it with a running vehicle counter, and return the worst-case
/// arrival time and the largest delay observed.
fn pessimistic_arrival(
    instance: &Instance,
    arc: ArcId,
    earliest_departure: f64,
    latest_departure: f64,
    travel_time: f64,
    arrivals: &[&RecordedArrival],
    departures: &[ConflictingDeparture],
) -> (f64, f64) {
    let mut events: Vec<(f64, u8)> = Vec::with_capacity(arrivals.len() + 2 * departures.len() + 1);
    // Arrival events past the departure window never fire: those vehicles
    // stay counted for the whole sweep.
    for arrival in arrivals {
        if arrival.latest_arrival <= latest_departure {
            events.push((arrival.latest_arrival, KIND_ARRIVAL));
        }
    }
    for departure in departures {
        events.push((departure.earliest_departure, KIND_DEPARTURE));
        if departure.latest_arrival <= latest_departure {
            events.push((departure.latest_arrival, KIND_ARRIVAL));
        }
    }
    events.push((latest_departure, KIND_BOUNDARY));
    events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    // Everything in `arrivals` may still be on the arc when the window opens.
    let mut count = arrivals.len() as u32 + 1;
    let mut max_delay = instance.delay(arc, count);
    let mut latest_arrival = earliest_departure + max_delay + travel_time;

    for (time, kind) in events {
        match kind {
            KIND_DEPARTURE => count += 1,
            KIND_ARRIVAL => count = count.saturating_sub(1),
            _ => {}
        }
        let delay = instance.delay(arc, count);
        max_delay = max_delay.max(delay);
        latest_arrival = latest_arrival.max(time + delay + travel_time);
    }
    (latest_arrival, max_delay)
}
