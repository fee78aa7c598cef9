//! `ev-dispatch` — pluggable dispatch policies.
//!
//! A policy maps a (fleet view, call) pair to the vehicle that should take
//! the call.  The controller holds the policy as a boxed capability and
//! keeps it informed of time and pickup departures, which is all the state
//! the cooldown decorator needs.
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | [`policy`] | The `DispatchPolicy` trait                      |
//! | [`nearest`]| `NearestIdlePolicy` — idle-first, then distance |
//! | [`cooldown`]| `CooldownPolicy` — decorator filtering recently departed cars |

pub mod cooldown;
pub mod nearest;
pub mod policy;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cooldown::{CooldownPolicy, DEFAULT_COOLDOWN_SECS};
pub use nearest::NearestIdlePolicy;
pub use policy::DispatchPolicy;
