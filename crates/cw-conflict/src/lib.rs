//! `cw-conflict` — who can contend with whom, and in what order.
//!
//! Two consumers of the converged bound table live here:
//!
//! - [`sets`]: partition each arc's visits into maximal temporally
//!   overlapping groups, keep the groups large enough to violate capacity,
//!   and split arcs whose groups are disjoint in time so every (possibly
//!   copied) arc carries exactly one conflicting set.
//! - [`binaries`]: given any concrete schedule, derive the pairwise
//!   precedence / follow / overlap relations the optimizer fixes or seeds
//!   its decision variables with.  Stateless; called once per candidate
//!   schedule.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Rayon-parallel per-arc grouping and binaries.            |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.       |

pub mod binaries;
pub mod error;
pub mod schedule;
pub mod sets;

#[cfg(test)]
mod tests;

pub use binaries::{compute_conflict_binaries, ConflictBinaries, OrderRelation};
pub use error::{ConflictError, ConflictResult};
pub use schedule::TripSchedule;
pub use sets::{extract_conflicting_sets, ConflictingSets, MIN_SET_CAPACITY};
