//! CSV instance loader.
//!
//! # CSV formats
//!
//! **Arcs** — one row per arc, ids assigned sequentially from 1 in file
//! order (the sink arc 0 is implicit and never listed):
//!
//! ```csv
//! travel_time,capacity
//! 100.0,1
//! 250.0,3
//! ```
//!
//! **Trips** — one row per trip, ids assigned sequentially from 0 in file
//! order.  The `route` field is a whitespace-separated list of arc ids
//! (without the sink, which the builder appends):
//!
//! ```csv
//! route,release_time,deadline,max_staggering
//! 1 2,0.0,900.0,60.0
//! 2,30.0,600.0,0.0
//! ```
//!
//! The shared PWL threshold/slope lists come from the caller: they are a
//! handful of numbers configured alongside the file paths, not tabular data.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use cw_core::ArcId;

use crate::error::{NetworkError, NetworkResult};
use crate::instance::{Instance, InstanceBuilder};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ArcRecord {
    travel_time: f64,
    capacity: u32,
}

#[derive(Deserialize)]
struct TripRecord {
    route: String,
    release_time: f64,
    deadline: f64,
    max_staggering: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an [`Instance`] from arc and trip CSV files plus the shared PWL
/// configuration.
pub fn load_instance_csv(
    arcs_path: &Path,
    trips_path: &Path,
    threshold_fractions: &[f64],
    slopes: &[f64],
) -> NetworkResult<Instance> {
    let arcs = std::fs::File::open(arcs_path).map_err(NetworkError::Io)?;
    let trips = std::fs::File::open(trips_path).map_err(NetworkError::Io)?;
    load_instance_readers(arcs, trips, threshold_fractions, slopes)
}

/// Like [`load_instance_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from network
/// streams.
pub fn load_instance_readers<A: Read, T: Read>(
    arcs: A,
    trips: T,
    threshold_fractions: &[f64],
    slopes: &[f64],
) -> NetworkResult<Instance> {
    let mut builder = InstanceBuilder::new();
    builder.delay_pieces(threshold_fractions, slopes);

    let mut arc_reader = csv::Reader::from_reader(arcs);
    for result in arc_reader.deserialize::<ArcRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        builder.add_arc(row.travel_time, row.capacity);
    }

    let mut trip_reader = csv::Reader::from_reader(trips);
    for result in trip_reader.deserialize::<TripRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let route = parse_route(&row.route)?;
        builder.add_trip(route, row.release_time, row.deadline, row.max_staggering);
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_route(s: &str) -> NetworkResult<Vec<ArcId>> {
    s.split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .map(ArcId)
                .map_err(|_| {
                    NetworkError::Parse(format!("invalid arc id {token:?} in route {s:?}"))
                })
        })
        .collect()
}
