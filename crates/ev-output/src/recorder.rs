//! The bus-to-record adapter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::warn;

use ev_events::{EventBus, Subscription};

use crate::EventRecord;

/// Subscribes to the bus, numbers each event, and feeds the batcher.
///
/// Sequence numbers start at 1 and are strictly monotonic — assigned here,
/// right where the stream is born, so contiguity cannot be broken by
/// anything downstream.  The send into the bounded channel blocks when the
/// channel is full; that suspension of the publishing (simulation) thread
/// is the event stream's backpressure.
pub struct EventRecorder;

impl EventRecorder {
    /// Attach to `bus`; records flow into `tx` until the subscription drops.
    pub fn attach(bus: &Arc<EventBus>, run_id: u32, tx: Sender<EventRecord>) -> Subscription {
        let sequence = AtomicU64::new(0);
        bus.subscribe(move |event| {
            let seq = sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let record = EventRecord::from_domain(run_id, seq, event);
            if tx.send(record).is_err() {
                // Consumer already gone (late event after shutdown).
                warn!("event pipeline closed; record {seq} dropped");
            }
        })
    }
}
