//! The event batcher: bounded, no-drop, periodically flushed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::warn;

use crate::{EventRecord, EventSink, OutputResult};

/// Bounded channel capacity.  Producers block (backpressure) when full.
pub const DEFAULT_CHANNEL_CAP: usize = 10_000;
/// Largest batch handed to the sink in one write.
pub const DEFAULT_MAX_BATCH: usize = 512;
/// Pause between flushes while the run is live.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the event consumer thread and the producer side of its channel.
///
/// Records are never dropped: the channel is bounded and a producer that
/// outruns the sink blocks on `send`.  The consumer drains up to
/// `max_batch` records per flush and rests `flush_interval` between
/// flushes.  Sink errors are logged and swallowed — they must not stall
/// the simulation.  [`shutdown`](EventBatcher::shutdown) drains whatever
/// remains, closes the sink, and joins the thread.
pub struct EventBatcher {
    tx: Sender<EventRecord>,
    handle: JoinHandle<()>,
    shutting_down: Arc<AtomicBool>,
}

impl EventBatcher {
    /// Spawn the consumer thread over `sink` with default tuning.
    pub fn spawn<S: EventSink + 'static>(sink: S) -> OutputResult<Self> {
        Self::with_options(sink, DEFAULT_CHANNEL_CAP, DEFAULT_MAX_BATCH, DEFAULT_FLUSH_INTERVAL)
    }

    pub fn with_options<S: EventSink + 'static>(
        sink: S,
        channel_cap: usize,
        max_batch: usize,
        flush_interval: Duration,
    ) -> OutputResult<Self> {
        let (tx, rx) = bounded(channel_cap);
        let shutting_down = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutting_down);
        let handle = thread::Builder::new()
            .name("ev-event-batcher".into())
            .spawn(move || consume(rx, sink, max_batch, flush_interval, flag))?;
        Ok(Self { tx, handle, shutting_down })
    }

    /// A producer handle.  `send` on it blocks while the channel is full —
    /// that block is the backpressure contract.
    pub fn sender(&self) -> Sender<EventRecord> {
        self.tx.clone()
    }

    /// Drain, flush, close the sink, and join the consumer.
    ///
    /// All other `Sender` clones must be dropped first or the consumer will
    /// keep waiting for more records.
    pub fn shutdown(self) {
        let Self { tx, handle, shutting_down } = self;
        shutting_down.store(true, Ordering::SeqCst);
        drop(tx); // close our side of the channel
        if handle.join().is_err() {
            warn!("event batcher thread panicked");
        }
    }
}

/// Consumer loop: blocking-wait for one record, drain a batch, flush, rest.
fn consume<S: EventSink>(
    rx: Receiver<EventRecord>,
    mut sink: S,
    max_batch: usize,
    flush_interval: Duration,
    shutting_down: Arc<AtomicBool>,
) {
    loop {
        // Wait until at least one record is available; a closed-and-empty
        // channel means every producer is gone and the drain is complete.
        let first = match rx.recv() {
            Ok(record) => record,
            Err(_) => break,
        };

        let mut batch = Vec::with_capacity(max_batch.min(64));
        batch.push(first);
        while batch.len() < max_batch {
            match rx.try_recv() {
                Ok(record) => batch.push(record),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if let Err(e) = sink.write_batch(&batch) {
            warn!("event sink write failed ({} records dropped): {e}", batch.len());
        }

        // Rest between flushes so batches can fill; skip the rest while
        // shutting down so the final drain is prompt.
        if !shutting_down.load(Ordering::SeqCst) {
            thread::sleep(flush_interval);
        }
    }

    if let Err(e) = sink.finish() {
        warn!("event sink close failed: {e}");
    }
}
