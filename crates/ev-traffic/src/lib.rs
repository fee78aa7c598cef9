//! `ev-traffic` — stochastic passenger generation.
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`curve`]     | `RateCurve` — piecewise-constant arrivals per second  |
//! | [`poisson`]   | non-homogeneous Poisson next-arrival via thinning     |
//! | [`person`]    | `Person`, `Route`, per-type traffic profiles          |
//! | [`directory`] | `PersonDirectory` — lifecycle registry, bus-fed       |
//! | [`controller`]| `PassengerController` — arrivals and return trips     |
//! | [`error`]     | `TrafficError`, `TrafficResult`                       |
//!
//! All randomness flows through the single `SimRng` owned by the passenger
//! controller, in a fixed draw order; a given seed reproduces the spawn
//! sequence exactly.

pub mod controller;
pub mod curve;
pub mod directory;
pub mod error;
pub mod person;
pub mod poisson;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use controller::PassengerController;
pub use curve::{RateCurve, RateSegment};
pub use directory::PersonDirectory;
pub use error::{TrafficError, TrafficResult};
pub use person::{Destination, Person, Route, TrafficProfile};
pub use poisson::next_arrival_thinning;
