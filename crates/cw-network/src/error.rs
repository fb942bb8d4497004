//! Network and instance validation errors.

use thiserror::Error;

use cw_core::{ArcId, TripId};

#[derive(Debug, Error)]
pub enum NetworkError {
    // ── PWL configuration (validated once at load time) ───────────────────
    #[error("PWL config: {fractions} threshold fractions but {slopes} slopes")]
    PwlLengthMismatch { fractions: usize, slopes: usize },

    #[error("PWL config: threshold fractions not strictly increasing at index {index}")]
    PwlNotIncreasing { index: usize },

    #[error("PWL config: negative slope {slope} at index {index}")]
    PwlNegativeSlope { index: usize, slope: f64 },

    #[error("PWL config: non-finite value at index {index}")]
    PwlNotFinite { index: usize },

    // ── Arc parameters ────────────────────────────────────────────────────
    #[error("arc {arc}: travel time {travel_time} must be finite and non-negative")]
    BadTravelTime { arc: ArcId, travel_time: f64 },

    #[error("arc {arc}: capacity must be at least 1")]
    ZeroCapacity { arc: ArcId },

    // ── Trip / route shape ────────────────────────────────────────────────
    #[error("trip {0}: route is empty")]
    EmptyRoute(TripId),

    #[error("trip {trip}: route references unknown arc {arc}")]
    UnknownArc { trip: TripId, arc: ArcId },

    #[error("trip {0}: route must not reference the sink arc (it is appended automatically)")]
    SinkInRoute(TripId),

    #[error("trip {0}: release time, deadline, and max staggering must be finite")]
    NonFiniteTime(TripId),

    #[error("trip {0}: max staggering must be non-negative")]
    NegativeStaggering(TripId),

    // ── Instance-level consistency ────────────────────────────────────────
    #[error(
        "trip {trip}: deadline {deadline} precedes free-flow completion {free_flow_completion}"
    )]
    InfeasibleDeadline {
        trip: TripId,
        deadline: f64,
        free_flow_completion: f64,
    },

    // ── Loading ───────────────────────────────────────────────────────────
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
