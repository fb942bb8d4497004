//! Conflict-module errors: shape mismatches between a caller-supplied
//! schedule and the instance it claims to schedule.

use thiserror::Error;

use cw_core::{ArcId, TripId};

#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("schedule covers {got} trips but the instance has {expected}")]
    TripCountMismatch { expected: usize, got: usize },

    #[error("trip {trip}: schedule has {got} positions but the route has {expected}")]
    PositionCountMismatch { trip: TripId, expected: usize, got: usize },

    #[error("trip {trip} is in the conflicting set of arc {arc} but never visits it")]
    MissingVisit { trip: TripId, arc: ArcId },
}

pub type ConflictResult<T> = Result<T, ConflictError>;
