//! `ev-events` — domain events and the in-process publish/subscribe bus.
//!
//! | Module    | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | [`call`]  | `CallRequest` — a person's transport request          |
//! | [`event`] | `DomainEvent` / `EventKind` tagged union              |
//! | [`bus`]   | `EventBus` — synchronous fan-out, disposable handles  |
//!
//! Publication is synchronous on the caller's thread so subscribers can
//! side-effect immediately (the output recorder feeds its bounded channel
//! from inside a handler).  The bus itself is thread-safe; in this system
//! only the simulation thread ever publishes.

pub mod bus;
pub mod call;
pub mod event;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bus::{EventBus, Subscription};
pub use call::CallRequest;
pub use event::{DomainEvent, EventKind};
