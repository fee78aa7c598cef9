//! Wiring for the two publication streams.

use std::path::Path;
use std::sync::Arc;

use ev_events::{EventBus, Subscription};

use crate::{
    EventBatcher, EventRecorder, NdjsonEventSink, NdjsonSnapshotSink, OutputResult,
    SnapshotCoalescer, TickSnapshot,
};

/// The full publication pipeline: recorder → batcher → `events.ndjson`,
/// and coalescer → `snapshots.ndjson`.
///
/// Create once per run; the simulation driver offers a snapshot per tick
/// and the bus feeds the event side automatically through the recorder
/// subscription.  [`shutdown`](Pipeline::shutdown) (also invoked on drop)
/// detaches the recorder first so the batcher's channel can close, then
/// drains and joins both consumer threads.
pub struct Pipeline {
    recorder_sub: Option<Subscription>,
    batcher: Option<EventBatcher>,
    coalescer: Option<SnapshotCoalescer>,
}

impl Pipeline {
    /// Open both NDJSON streams in `dir` (created fresh, overwriting any
    /// previous run) and spawn the consumer threads.
    pub fn create(dir: &Path, run_id: u32, bus: &Arc<EventBus>) -> OutputResult<Self> {
        let batcher = EventBatcher::spawn(NdjsonEventSink::create(dir)?)?;
        let recorder_sub = EventRecorder::attach(bus, run_id, batcher.sender());
        let coalescer = SnapshotCoalescer::spawn(NdjsonSnapshotSink::create(dir)?)?;
        Ok(Self {
            recorder_sub: Some(recorder_sub),
            batcher: Some(batcher),
            coalescer: Some(coalescer),
        })
    }

    /// Offer a snapshot to the coalescer (never blocks; drop-oldest).
    pub fn offer_snapshot(&self, snapshot: TickSnapshot) {
        if let Some(coalescer) = &self.coalescer {
            coalescer.offer(snapshot);
        }
    }

    /// Flip the snapshot stream's wall-time throttle at runtime.
    pub fn set_wall_throttle(&self, enabled: bool) {
        if let Some(coalescer) = &self.coalescer {
            coalescer.set_wall_throttle(enabled);
        }
    }

    /// Drain both streams and join the consumer threads.  Idempotent.
    pub fn shutdown(&mut self) {
        // Unsubscribe the recorder first: its channel sender must drop
        // before the batcher can observe a closed channel and finish.
        self.recorder_sub.take();
        if let Some(batcher) = self.batcher.take() {
            batcher.shutdown();
        }
        if let Some(coalescer) = self.coalescer.take() {
            coalescer.shutdown();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
