//! `ev-output` — the asynchronous publication pipeline.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`record`]   | `EventRecord` — the NDJSON event wire type                |
//! | [`snapshot`] | `TickSnapshot` and friends — the NDJSON snapshot wire type |
//! | [`sink`]     | `EventSink`/`SnapshotSink` traits + NDJSON backends       |
//! | [`recorder`] | bus subscription turning domain events into records       |
//! | [`batcher`]  | bounded, no-drop event batching on a background thread    |
//! | [`coalescer`]| capacity-1, drop-oldest snapshot publishing               |
//! | [`pipeline`] | wiring + shutdown of the two consumer threads             |
//! | [`error`]    | `OutputError`, `OutputResult`                             |
//!
//! The two consumer threads never touch domain state: they see value-typed
//! records copied at the bus boundary.  Events get backpressure (producers
//! block on a full channel, nothing is dropped); snapshots get coalescing
//! (only the latest survives, producers never block).  Sink errors are
//! logged and swallowed — the simulation must never stall on its output.

pub mod batcher;
pub mod coalescer;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod recorder;
pub mod sink;
pub mod snapshot;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use batcher::{EventBatcher, DEFAULT_CHANNEL_CAP, DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_BATCH};
pub use coalescer::{SnapshotCoalescer, DEFAULT_THROTTLE_PERIOD};
pub use error::{OutputError, OutputResult};
pub use pipeline::Pipeline;
pub use record::{EventRecord, Payload, CONTRACT_VERSION};
pub use recorder::EventRecorder;
pub use sink::{EventSink, NdjsonEventSink, NdjsonSnapshotSink, SnapshotSink};
pub use snapshot::{ElevatorSnapshot, FloorQueueSnapshot, TickSnapshot};
