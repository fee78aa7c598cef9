//! `ev-core` — foundational types for the `evsim` elevator-traffic simulator.
//!
//! This crate is a dependency of every other `ev-*` crate.  It intentionally
//! has no `ev-*` dependencies and minimal external ones (only `rand`,
//! `serde`, and `thiserror`).
//!
//! # What lives here
//!
//! | Module        | Contents                                      |
//! |---------------|-----------------------------------------------|
//! | [`ids`]       | `PersonId`, `VehicleId`, `CallId`             |
//! | [`direction`] | `Direction` (travel direction of a call/car)  |
//! | [`person`]    | `PersonType`, `PersonState`                   |
//! | [`time`]      | `Tick`, `SimClock`, `SimConfig`               |
//! | [`rng`]       | `SimRng` (single seeded RNG per run)          |
//! | [`error`]     | `CoreError`, `CoreResult`                     |

pub mod direction;
pub mod error;
pub mod ids;
pub mod person;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use ids::{CallId, PersonId, VehicleId};
pub use person::{PersonState, PersonType};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
