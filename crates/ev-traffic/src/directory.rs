//! The person directory: lifecycle registry for every spawned person.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::warn;

use ev_core::{PersonId, PersonState};
use ev_events::{DomainEvent, EventBus, EventKind, Subscription};

use crate::Person;

const SOURCE: &str = "traffic";

struct DirectoryInner {
    persons: HashMap<PersonId, Person>,
    spawned: u64,
}

/// Registry of all spawned persons and their lifecycle state.
///
/// The passenger controller inserts people at spawn and flips them back to
/// `Waiting` when their return call fires; the `Riding`/`Staying`/
/// `Completed` transitions are driven by board/alight events through the
/// bus subscription created by [`attach`](PersonDirectory::attach).  Every
/// transition is re-published as `PersonStateChanged`.
///
/// States only move forward; an event that would move one backwards is
/// logged and dropped (it would mean controller bookkeeping broke).
pub struct PersonDirectory {
    inner: Mutex<DirectoryInner>,
}

impl PersonDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(DirectoryInner {
                persons: HashMap::new(),
                spawned: 0,
            }),
        })
    }

    /// Subscribe the directory to board/alight events on `bus`.
    ///
    /// The handler publishes follow-up `PersonStateChanged` events back into
    /// the same bus; the bus dispatches outside its lock, so the nested
    /// publish is safe.
    pub fn attach(self: &Arc<Self>, bus: &Arc<EventBus>) -> Subscription {
        let dir = Arc::clone(self);
        let bus_ref = Arc::clone(bus);
        bus.subscribe(move |event| match event.kind {
            EventKind::PersonBoarded { person_id, .. } => {
                dir.mark_riding(person_id, event.t, &bus_ref);
            }
            EventKind::PersonAlighted { person_id, floor, .. } => {
                dir.mark_alighted(person_id, floor, event.t, &bus_ref);
            }
            _ => {}
        })
    }

    /// Record a freshly spawned person (state `Waiting`).
    pub fn insert(&self, person: Person) {
        let mut inner = self.inner.lock().unwrap();
        inner.spawned += 1;
        inner.persons.insert(person.id, person);
    }

    /// Flip a `Staying` person back to `Waiting` and advance their route —
    /// called when their scheduled return call fires.  Publishes the state
    /// change.  Returns `false` if the person is unknown or not staying.
    pub fn mark_waiting(&self, person_id: PersonId, t: f64, bus: &EventBus) -> bool {
        let from = {
            let mut inner = self.inner.lock().unwrap();
            let Some(person) = inner.persons.get_mut(&person_id) else {
                warn!("return fired for unknown {person_id}");
                return false;
            };
            if person.state != PersonState::Staying {
                warn!("return fired for {person_id} in state {}", person.state);
                return false;
            }
            let from = person.state;
            person.route_index += 1;
            person.state = PersonState::Waiting;
            from
        };
        publish_change(bus, t, person_id, from, PersonState::Waiting);
        true
    }

    fn mark_riding(&self, person_id: PersonId, t: f64, bus: &EventBus) {
        let from = {
            let mut inner = self.inner.lock().unwrap();
            let Some(person) = inner.persons.get_mut(&person_id) else { return };
            if person.state != PersonState::Waiting {
                warn!("board event for {person_id} in state {}", person.state);
                return;
            }
            let from = person.state;
            person.state = PersonState::Riding;
            from
        };
        publish_change(bus, t, person_id, from, PersonState::Riding);
    }

    fn mark_alighted(&self, person_id: PersonId, floor: u32, t: f64, bus: &EventBus) {
        let (from, to) = {
            let mut inner = self.inner.lock().unwrap();
            let Some(person) = inner.persons.get_mut(&person_id) else { return };
            if person.state != PersonState::Riding {
                warn!("alight event for {person_id} in state {}", person.state);
                return;
            }
            let from = person.state;
            person.current_floor = floor;
            let to = if person.on_final_leg() {
                PersonState::Completed
            } else {
                PersonState::Staying
            };
            person.state = to;
            (from, to)
        };
        publish_change(bus, t, person_id, from, to);
    }

    // ── Read accessors ────────────────────────────────────────────────────

    /// Total people ever spawned.
    pub fn spawned_total(&self) -> u64 {
        self.inner.lock().unwrap().spawned
    }

    /// Number of people currently in `state`.
    pub fn count_in(&self, state: PersonState) -> usize {
        self.inner
            .lock()
            .unwrap()
            .persons
            .values()
            .filter(|p| p.state == state)
            .count()
    }

    /// Snapshot of one person.
    pub fn get(&self, person_id: PersonId) -> Option<Person> {
        self.inner.lock().unwrap().persons.get(&person_id).cloned()
    }
}

fn publish_change(bus: &EventBus, t: f64, person_id: PersonId, from: PersonState, to: PersonState) {
    bus.publish(&DomainEvent::new(
        t,
        SOURCE,
        EventKind::PersonStateChanged { person_id, from, to },
    ));
}
