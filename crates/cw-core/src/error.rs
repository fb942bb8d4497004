//! Toolkit error type.
//!
//! Sub-crates may define their own error enums and convert them into `CwError`
//! via `From` impls, or keep them separate and wrap `CwError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{ArcId, TripId};

/// The top-level error type for `cw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CwError {
    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("arc {0} not found")]
    ArcNotFound(ArcId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `cw-*` crates.
pub type CwResult<T> = Result<T, CwError>;
