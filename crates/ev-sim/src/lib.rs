//! `ev-sim` — the simulation driver.
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`sim`]      | `Sim` and its fixed-step tick loop                |
//! | [`builder`]  | `SimBuilder` — validate config, wire everything   |
//! | [`assembler`]| per-tick snapshot assembly (deep copies)          |
//! | [`observer`] | `SimObserver` progress hooks                      |
//! | [`error`]    | `SimError`, `SimResult`                           |
//!
//! # Tick order
//!
//! ```text
//! for each tick at sim time t:
//!   ① passenger controller — fire due returns, generate arrivals
//!   ② elevator controller  — assign pending calls, step assignments
//!   ③ vehicle mechanics    — advance positions and timers by dt
//!   ④ snapshot             — assemble and offer to the coalescer
//! ```
//!
//! Steps ①–③ publish domain events synchronously; the output recorder
//! (subscribed first) adapts them into records as they happen.  The whole
//! step is single-threaded — only the publication pipeline runs on
//! background threads, and it never touches domain state.

pub mod assembler;
pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use assembler::assemble_snapshot;
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
