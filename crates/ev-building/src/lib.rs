//! `ev-building` — the physical plant of the simulation.
//!
//! | Module       | Contents                                           |
//! |--------------|----------------------------------------------------|
//! | [`floor`]    | `Floor` — FIFO up/down wait queues, occupant count |
//! | [`building`] | `Building` — ordered floor array                   |
//! | [`vehicle`]  | `Vehicle` — car motion and timed service states    |
//! | [`error`]    | `BuildingError`, `BuildingResult`                  |
//!
//! Nothing here knows about calls, assignments, or events: the controller
//! crate owns all timing semantics and drives these types through their
//! public operations.

pub mod building;
pub mod error;
pub mod floor;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use building::Building;
pub use error::{BuildingError, BuildingResult};
pub use floor::Floor;
pub use vehicle::{Vehicle, VehicleState};
