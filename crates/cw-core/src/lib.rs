//! `cw-core` — foundational types for the `rust_cw` congestion-window toolkit.
//!
//! This crate is a dependency of every other `cw-*` crate.  It intentionally
//! has no `cw-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                        |
//! |---------------|-------------------------------------------------|
//! | [`ids`]       | `TripId`, `ArcId`                               |
//! | [`tolerance`] | `TOLERANCE`, `CONSTR_TOLERANCE`, `Tolerances`   |
//! | [`error`]     | `CwError`, `CwResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod error;
pub mod ids;
pub mod tolerance;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CwError, CwResult};
pub use ids::{ArcId, TripId};
pub use tolerance::{Tolerances, CONSTR_TOLERANCE, TOLERANCE};
