//! `cw-propagate` — the fixed-point time-window propagation engine.
//!
//! Consumes a validated [`Instance`](cw_network::Instance) and produces, for
//! every trip and every position along its route, the tightest
//! earliest/latest departure and arrival bounds consistent with the
//! congestion delay model, plus the min/max delay each visit can incur.
//!
//! # Crate layout
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`bounds`]     | `TimeBound`, `TripBounds`                           |
//! | [`event`]      | heap event type with deterministic ordering         |
//! | [`propagator`] | `Propagator`, `PropagatorConfig` — the engine       |
//! | [`observer`]   | `PropagateObserver`, `NoopObserver`                 |
//! | [`error`]      | `PropagateError`, `PropagateResult<T>`              |

pub mod bounds;
pub mod error;
pub mod observer;
pub mod propagator;

mod event;

#[cfg(test)]
mod tests;

pub use bounds::{TimeBound, TripBounds};
pub use error::{PropagateError, PropagateResult};
pub use observer::{NoopObserver, PropagateObserver};
pub use propagator::{Propagator, PropagatorConfig};
