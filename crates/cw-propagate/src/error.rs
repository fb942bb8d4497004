//! Propagation errors.
//!
//! Bound violations and non-convergence are fatal: they indicate either a
//! bug or a pathological instance, never a retryable condition.  The
//! computation is deterministic given its inputs.

use thiserror::Error;

use cw_core::TripId;
use cw_network::NetworkError;

#[derive(Debug, Error)]
pub enum PropagateError {
    /// The instance failed fail-fast validation (infeasible deadline, bad
    /// PWL configuration, malformed route).
    #[error(transparent)]
    Instance(#[from] NetworkError),

    #[error(
        "trip {trip} position {position}: latest departure {latest_departure} \
         precedes earliest departure {earliest_departure}"
    )]
    DepartureBoundViolation {
        trip: TripId,
        position: usize,
        earliest_departure: f64,
        latest_departure: f64,
    },

    #[error(
        "trip {trip} position {position}: latest arrival {latest_arrival} \
         precedes earliest arrival {earliest_arrival}"
    )]
    ArrivalBoundViolation {
        trip: TripId,
        position: usize,
        earliest_arrival: f64,
        latest_arrival: f64,
    },

    #[error("latest-arrival fixed point not reached after {iterations} iterations")]
    NonConvergence { iterations: usize },
}

pub type PropagateResult<T> = Result<T, PropagateError>;
