//! Simulation observer trait for progress reporting.

use ev_core::Tick;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at tick boundaries.
///
/// All methods default to no-ops so implementors only override what they
/// care about.  The launching application typically uses these for a
/// progress line; the NDJSON output does not go through here.
pub trait SimObserver {
    /// Called before any processing of a tick.
    fn on_tick_start(&mut self, _tick: Tick, _t: f64) {}

    /// Called after the tick's snapshot has been offered.
    fn on_tick_end(&mut self, _tick: Tick, _t: f64) {}

    /// Called once after the final tick, before pipeline shutdown.
    fn on_run_end(&mut self, _final_tick: Tick, _t: f64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
