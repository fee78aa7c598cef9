//! Synchronous in-process publish/subscribe.

use std::sync::{Arc, Mutex, Weak};

use crate::DomainEvent;

type Handler = Arc<dyn Fn(&DomainEvent) + Send + Sync>;

struct BusInner {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Typed in-process event bus.
///
/// `publish` invokes every subscribed handler synchronously, in
/// subscription order, on the caller's thread.  The handler list lives
/// behind a mutex used only for subscription bookkeeping: dispatch clones
/// the current list under the lock and invokes outside it, so a handler may
/// itself publish (the person directory does) without deadlocking.
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(BusInner {
                next_id: 1,
                handlers: Vec::new(),
            }),
        })
    }

    /// Register `handler` and return the handle that owns the registration.
    ///
    /// Dropping (or [`close`](Subscription::close)-ing) the handle
    /// unregisters the handler; hold it for as long as events should flow.
    pub fn subscribe<F>(self: &Arc<Self>, handler: F) -> Subscription
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        Subscription {
            id,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    pub fn publish(&self, event: &DomainEvent) {
        let handlers: Vec<Handler> = {
            let inner = self.inner.lock().unwrap();
            inner.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().handlers.len()
    }

    fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.handlers.retain(|(h_id, _)| *h_id != id);
    }
}

/// Handle owning one bus registration.  Unregisters on drop.
pub struct Subscription {
    id: u64,
    bus: Weak<EventBus>,
}

impl Subscription {
    /// Explicitly unregister now (equivalent to dropping the handle).
    pub fn close(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}
