//! Seeded random instance generator (feature = `"gen"` only).
//!
//! Produces *feasible* instances by construction: each trip's deadline is its
//! free-flow completion time stretched by `slack_factor`, so the builder's
//! deadline check never trips.  Intended for convergence stress tests and
//! benchmarks; the same seed always yields the same instance.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cw_core::ArcId;

use crate::error::NetworkResult;
use crate::instance::{Instance, InstanceBuilder};

/// Configuration for [`generate`].
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Number of physical arcs (sink excluded).
    pub arc_count: usize,
    /// Number of trips.
    pub trip_count: usize,
    /// Route length sampled uniformly from this inclusive range.
    pub route_len: (usize, usize),
    /// Free-flow travel time sampled uniformly from this range (seconds).
    pub travel_time: (f64, f64),
    /// Capacity sampled uniformly from this inclusive range.
    pub capacity: (u32, u32),
    /// Release time sampled uniformly from `[0, release_span]`.
    pub release_span: f64,
    /// Deadline = release + free-flow duration × this factor.  Must be ≥ 1.
    pub slack_factor: f64,
    /// Max staggering applied uniformly to every trip.
    pub max_staggering: f64,
    /// Shared PWL threshold fractions.
    pub threshold_fractions: Vec<f64>,
    /// Shared PWL slopes.
    pub slopes: Vec<f64>,
    /// RNG seed.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            arc_count: 50,
            trip_count: 100,
            route_len: (2, 6),
            travel_time: (30.0, 300.0),
            capacity: (1, 4),
            release_span: 1_800.0,
            slack_factor: 1.5,
            max_staggering: 120.0,
            threshold_fractions: vec![1.0, 2.0],
            slopes: vec![0.5, 1.0],
            seed: 0,
        }
    }
}

/// Generate a feasible random instance from `config`.
pub fn generate(config: &GeneratorConfig) -> NetworkResult<Instance> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut builder = InstanceBuilder::new();
    builder.delay_pieces(&config.threshold_fractions, &config.slopes);

    let mut travel_times = Vec::with_capacity(config.arc_count);
    for _ in 0..config.arc_count {
        let travel_time = rng.gen_range(config.travel_time.0..=config.travel_time.1);
        let capacity = rng.gen_range(config.capacity.0..=config.capacity.1);
        builder.add_arc(travel_time, capacity);
        travel_times.push(travel_time);
    }

    for _ in 0..config.trip_count {
        let len = rng
            .gen_range(config.route_len.0..=config.route_len.1)
            .min(config.arc_count);
        // Sample distinct arcs so a trip never revisits one.
        let mut route: Vec<ArcId> = Vec::with_capacity(len);
        while route.len() < len {
            let arc = ArcId(rng.gen_range(1..=config.arc_count as u32));
            if !route.contains(&arc) {
                route.push(arc);
            }
        }

        let free_flow: f64 = route
            .iter()
            .map(|a| travel_times[a.index() - 1])
            .sum();
        let release_time = rng.gen_range(0.0..=config.release_span);
        let deadline = release_time + free_flow * config.slack_factor;
        builder.add_trip(route, release_time, deadline, config.max_staggering);
    }

    builder.build()
}
