//! Numeric tolerances shared across the toolkit.
//!
//! # Design
//!
//! Two distinct tolerances exist and they are **not** interchangeable:
//!
//! - [`TOLERANCE`] (`eps`) absorbs floating-point noise in bound
//!   comparisons inside the propagator (`latest >= earliest - eps`).
//! - [`CONSTR_TOLERANCE`] is the minimum separation the downstream
//!   optimizer enforces between scheduled events.
//!
//! Tie detection in the conflict binaries uses the *combined* threshold
//! `CONSTR_TOLERANCE - TOLERANCE`.  The combination is kept exactly as the
//! downstream constraint model expects it; do not collapse the two into a
//! single constant.

/// Floating-point comparison slack for propagated bounds.
pub const TOLERANCE: f64 = 1e-6;

/// Minimum event separation assumed by downstream scheduling constraints.
pub const CONSTR_TOLERANCE: f64 = 1e-3;

/// Tolerance pair carried through the conflict-binaries computation.
///
/// Cheap to copy; construct once at the application layer and pass by value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    /// Floating-point slack (`TOLERANCE`).
    pub eps: f64,
    /// Constraint separation (`CONSTR_TOLERANCE`).
    pub constr: f64,
}

impl Tolerances {
    pub fn new(eps: f64, constr: f64) -> Self {
        Self { eps, constr }
    }

    /// Two scheduled times closer than this are an exact tie and must be
    /// reported as undetermined rather than ordered.
    #[inline]
    pub fn tie_threshold(&self) -> f64 {
        self.constr - self.eps
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { eps: TOLERANCE, constr: CONSTR_TOLERANCE }
    }
}
