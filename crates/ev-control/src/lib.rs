//! `ev-control` — the elevator controller.
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`assignment`] | `ActiveAssignment` and its seven phases             |
//! | [`controller`] | `ElevatorController` — pending queue, per-tick step |
//! | [`error`]      | `ControlError`, `ControlResult`                     |
//!
//! The controller owns the fleet and a boxed dispatch policy.  Each tick it
//! assigns pending calls, steps every active assignment through its phase
//! machine, and announces everything observable on the event bus.  All
//! timing semantics (dwell seconds, per-person load rates) live here; the
//! vehicles only count timers down and move.

pub mod assignment;
pub mod controller;
pub mod error;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use assignment::{ActiveAssignment, AssignmentPhase};
pub use controller::{ElevatorController, DOOR_DWELL_SECS};
pub use error::{ControlError, ControlResult};
