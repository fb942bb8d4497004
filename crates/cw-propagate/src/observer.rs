//! Propagation observer trait for progress reporting.

/// Callbacks invoked by [`Propagator::run_observed`][crate::Propagator::run_observed]
/// at the outer fixed-point loop boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The core has no built-in cancellation
/// or timeout; callers that impose a wall-clock budget do so around the whole
/// call and must treat an aborted run as "no result", never a partial one.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl PropagateObserver for ProgressPrinter {
///     fn on_iteration(&mut self, iteration: usize, changed: usize) {
///         println!("iteration {iteration}: {changed} latest-arrival bounds changed");
///     }
/// }
/// ```
pub trait PropagateObserver {
    /// Called after each inner sweep with the number of latest-arrival
    /// entries that changed relative to the previous iteration.
    fn on_iteration(&mut self, _iteration: usize, _changed: usize) {}

    /// Called once when the fixed point is reached.
    fn on_converged(&mut self, _iterations: usize) {}
}

/// A [`PropagateObserver`] that does nothing.  Use when you need to call the
/// propagator but don't want progress callbacks.
pub struct NoopObserver;

impl PropagateObserver for NoopObserver {}
