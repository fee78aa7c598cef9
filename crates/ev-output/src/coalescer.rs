//! The snapshot coalescer: capacity 1, drop-oldest, never blocks producers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

use crate::{OutputResult, SnapshotSink, TickSnapshot};

/// Wakeup period in wall-throttle mode, and the consumer's poll interval
/// for noticing mode flips and shutdown.
pub const DEFAULT_THROTTLE_PERIOD: Duration = Duration::from_millis(200);

/// A capacity-1 slot plus the flags both sides need.
struct Shared {
    /// The newest snapshot not yet published.  `offer` replaces any queued
    /// value: between two consumer wakeups only the latest survives.
    latest: Mutex<Option<TickSnapshot>>,
    available: Condvar,
    shutting_down: AtomicBool,
    wall_throttle: AtomicBool,
}

/// Owns the snapshot consumer thread.
///
/// In fast mode the consumer publishes each offered snapshot as soon as it
/// can; in wall-throttle mode it wakes on a fixed wall-clock period and
/// publishes only the latest.  Either way no older snapshot is ever
/// published after a newer one, and `offer` never blocks the simulation.
pub struct SnapshotCoalescer {
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
    throttle_period: Duration,
}

impl SnapshotCoalescer {
    /// Spawn the consumer thread over `sink` (fast mode).
    pub fn spawn<S: SnapshotSink + 'static>(sink: S) -> OutputResult<Self> {
        Self::with_period(sink, DEFAULT_THROTTLE_PERIOD)
    }

    pub fn with_period<S: SnapshotSink + 'static>(
        sink: S,
        throttle_period: Duration,
    ) -> OutputResult<Self> {
        let shared = Arc::new(Shared {
            latest: Mutex::new(None),
            available: Condvar::new(),
            shutting_down: AtomicBool::new(false),
            wall_throttle: AtomicBool::new(false),
        });
        let consumer_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("ev-snapshot-coalescer".into())
            .spawn(move || consume(consumer_shared, sink, throttle_period))?;
        Ok(Self { shared, handle, throttle_period })
    }

    /// Queue `snapshot` for publication, replacing any snapshot still
    /// queued.  Never blocks beyond the slot lock.
    pub fn offer(&self, snapshot: TickSnapshot) {
        let mut slot = self.shared.latest.lock().unwrap();
        *slot = Some(snapshot);
        self.shared.available.notify_one();
    }

    /// Switch between fast mode and wall-throttle mode at runtime.
    pub fn set_wall_throttle(&self, enabled: bool) {
        self.shared.wall_throttle.store(enabled, Ordering::SeqCst);
        self.shared.available.notify_one();
    }

    pub fn throttle_period(&self) -> Duration {
        self.throttle_period
    }

    /// Publish the most recent remaining snapshot best-effort and join.
    pub fn shutdown(self) {
        self.shared.shutting_down.store(true, Ordering::SeqCst);
        self.shared.available.notify_one();
        if self.handle.join().is_err() {
            warn!("snapshot coalescer thread panicked");
        }
    }
}

/// Take the queued snapshot, if any.
fn take_latest(shared: &Shared) -> Option<TickSnapshot> {
    shared.latest.lock().unwrap().take()
}

fn consume<S: SnapshotSink>(shared: Arc<Shared>, mut sink: S, period: Duration) {
    loop {
        if shared.shutting_down.load(Ordering::SeqCst) {
            break;
        }

        let snapshot = if shared.wall_throttle.load(Ordering::SeqCst) {
            // Wall-throttle mode: sleep a period, then publish the latest.
            thread::sleep(period);
            take_latest(&shared)
        } else {
            // Fast mode: wait until something is offered.  The timeout lets
            // the loop notice mode flips and shutdown without a wakeup.
            let slot = shared.latest.lock().unwrap();
            let (mut slot, _) = shared
                .available
                .wait_timeout_while(slot, period, |s| {
                    s.is_none() && !shared.shutting_down.load(Ordering::SeqCst)
                })
                .unwrap();
            slot.take()
        };

        if let Some(snapshot) = snapshot {
            if let Err(e) = sink.write_snapshot(&snapshot) {
                warn!("snapshot sink write failed (snapshot dropped): {e}");
            }
        }
    }

    // Shutdown: flush the most recent remaining snapshot best-effort.
    if let Some(snapshot) = take_latest(&shared) {
        if let Err(e) = sink.write_snapshot(&snapshot) {
            warn!("snapshot sink write failed at shutdown: {e}");
        }
    }
    if let Err(e) = sink.finish() {
        warn!("snapshot sink close failed: {e}");
    }
}
