//! Piecewise-linear congestion delay model.
//!
//! # Shape
//!
//! One ordered list of `(threshold_fraction, slope)` pairs is shared by the
//! whole network and scaled per arc:
//!
//! - absolute threshold `k` = `threshold_fraction[k] * capacity(arc)`
//! - scaled slope `k`      = `slope[k] * travel_time(arc) / capacity(arc)`
//!
//! Segments connect continuously: a running "height" accumulates the delay
//! reached at each threshold boundary, and the delay for a vehicle count `n`
//! is the **maximum** over all pieces whose threshold `n` exceeds.  Taking
//! the maximum guards against counts that clear only some interior
//! thresholds.  Below the first threshold the delay is exactly zero.

use crate::arc::ArcParams;
use crate::error::{NetworkError, NetworkResult};

/// One validated `(threshold_fraction, slope)` pair.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PwlPiece {
    pub threshold_fraction: f64,
    pub slope: f64,
}

/// The network-wide congestion delay function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayModel {
    pieces: Vec<PwlPiece>,
}

impl DelayModel {
    /// Build and validate a delay model from parallel threshold/slope lists.
    ///
    /// Fails if the lists differ in length, thresholds are not strictly
    /// increasing, any slope is negative (the function must be monotone in
    /// the vehicle count), or any value is non-finite.
    pub fn new(threshold_fractions: &[f64], slopes: &[f64]) -> NetworkResult<Self> {
        if threshold_fractions.len() != slopes.len() {
            return Err(NetworkError::PwlLengthMismatch {
                fractions: threshold_fractions.len(),
                slopes: slopes.len(),
            });
        }
        for (i, (&f, &s)) in threshold_fractions.iter().zip(slopes).enumerate() {
            if !f.is_finite() || !s.is_finite() {
                return Err(NetworkError::PwlNotFinite { index: i });
            }
            if s < 0.0 {
                return Err(NetworkError::PwlNegativeSlope { index: i, slope: s });
            }
            if i > 0 && f <= threshold_fractions[i - 1] {
                return Err(NetworkError::PwlNotIncreasing { index: i });
            }
        }
        let pieces = threshold_fractions
            .iter()
            .zip(slopes)
            .map(|(&threshold_fraction, &slope)| PwlPiece { threshold_fraction, slope })
            .collect();
        Ok(Self { pieces })
    }

    /// A model with no pieces: every count maps to zero delay.
    pub fn uncongested() -> Self {
        Self { pieces: Vec::new() }
    }

    pub fn pieces(&self) -> &[PwlPiece] {
        &self.pieces
    }

    /// The first threshold fraction, or `+inf` if the model has no pieces.
    ///
    /// `capacity * first_threshold_fraction()` is the vehicle count an arc
    /// tolerates with zero delay; conflict-set extraction uses it to discard
    /// groups that can never violate capacity.
    pub fn first_threshold_fraction(&self) -> f64 {
        self.pieces
            .first()
            .map_or(f64::INFINITY, |p| p.threshold_fraction)
    }

    /// Delay for `n` vehicles on an arc with parameters `arc`.
    ///
    /// Monotone non-decreasing in `n`; zero for
    /// `n <= threshold_fraction[0] * capacity`.
    pub fn delay(&self, arc: &ArcParams, n: u32) -> f64 {
        let n = f64::from(n);
        let cap = f64::from(arc.capacity);
        let unit = arc.travel_time / cap;

        let mut height = 0.0;
        let mut delay: f64 = 0.0;
        for (k, piece) in self.pieces.iter().enumerate() {
            let threshold = piece.threshold_fraction * cap;
            let slope = piece.slope * unit;
            if n > threshold {
                delay = delay.max(height + slope * (n - threshold));
            }
            if let Some(next) = self.pieces.get(k + 1) {
                height += slope * (next.threshold_fraction * cap - threshold);
            }
        }
        delay
    }
}
