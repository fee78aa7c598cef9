//! The passenger controller: arrival generation and scheduled return trips.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use log::debug;

use ev_building::Building;
use ev_control::ElevatorController;
use ev_core::time::SECS_PER_DAY;
use ev_core::{CallId, PersonId, PersonType, SimRng};
use ev_events::{CallRequest, DomainEvent, EventBus, EventKind};

use crate::{
    next_arrival_thinning, Person, PersonDirectory, Route, TrafficProfile, TrafficResult,
};

const SOURCE: &str = "traffic";

// ── Scheduled returns ─────────────────────────────────────────────────────────

/// A return call waiting in the min-heap until its due time.
///
/// `seq` breaks ties between equal due times so heap order (and therefore
/// submission order) is deterministic.
struct ScheduledReturn {
    due: f64,
    seq: u64,
    call: CallRequest,
}

impl PartialEq for ScheduledReturn {
    fn eq(&self, other: &Self) -> bool {
        self.due.total_cmp(&other.due).is_eq() && self.seq == other.seq
    }
}
impl Eq for ScheduledReturn {}

impl PartialOrd for ScheduledReturn {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ScheduledReturn {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

// ── PassengerController ───────────────────────────────────────────────────────

/// Generates passenger arrivals from per-type rate curves and fires
/// scheduled return trips.
///
/// Owns the run's single [`SimRng`]; every draw happens in a fixed order
/// (returns first, then types in `PersonType::ALL` order), so identical
/// seeds and inputs reproduce the spawn sequence exactly.
pub struct PassengerController {
    rng: SimRng,
    profiles: Vec<(PersonType, TrafficProfile)>,
    /// Next arrival time per profile, `None` until first sampled,
    /// `f64::INFINITY` when the curve yields nothing within the horizon.
    next_arrival: Vec<Option<f64>>,
    scheduled: BinaryHeap<Reverse<ScheduledReturn>>,
    heap_seq: u64,
    next_person: u64,
    next_call: u64,
    start_of_day_secs: f64,
    horizon_secs: f64,
    directory: Arc<PersonDirectory>,
    bus: Arc<EventBus>,
}

impl PassengerController {
    pub fn new(
        seed: u64,
        profiles: Vec<(PersonType, TrafficProfile)>,
        start_of_day_secs: f64,
        directory: Arc<PersonDirectory>,
        bus: Arc<EventBus>,
    ) -> Self {
        let type_count = profiles.len();
        Self {
            rng: SimRng::new(seed),
            profiles,
            next_arrival: vec![None; type_count],
            scheduled: BinaryHeap::new(),
            heap_seq: 0,
            next_person: 1,
            next_call: 1,
            start_of_day_secs,
            horizon_secs: SECS_PER_DAY,
            directory,
            bus,
        }
    }

    /// Override the thinning horizon (default: one day).
    pub fn with_horizon(mut self, horizon_secs: f64) -> Self {
        self.horizon_secs = horizon_secs;
        self
    }

    /// Scheduled return calls not yet fired.
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Run one generation step at simulation time `now`.
    ///
    /// Fires due return calls first, then samples fresh arrivals per type.
    pub fn tick(
        &mut self,
        building: &mut Building,
        elevators: &mut ElevatorController,
        now: f64,
    ) -> TrafficResult<()> {
        self.fire_due_returns(building, elevators, now)?;
        self.generate_arrivals(building, elevators, now)?;
        Ok(())
    }

    // ── Scheduled returns ─────────────────────────────────────────────────

    fn fire_due_returns(
        &mut self,
        building: &mut Building,
        elevators: &mut ElevatorController,
        now: f64,
    ) -> TrafficResult<()> {
        loop {
            match self.scheduled.peek() {
                Some(Reverse(entry)) if entry.due <= now => {}
                _ => break,
            }
            let Some(Reverse(entry)) = self.scheduled.pop() else { break };
            let call = entry.call;
            debug!("T={now:.1} return fires for {} at floor {}", call.person_id, call.origin);

            // A return may fire while the person is still mid-first-leg (the
            // due time is anchored at spawn, not at actual arrival).  The
            // directory refuses the backward transition in that case and the
            // floor occupant count is left alone.
            if self.directory.mark_waiting(call.person_id, now, &self.bus) {
                building.get_floor_mut(call.origin)?.remove_occupant();
            }

            self.bus.publish(&DomainEvent::new(
                now,
                SOURCE,
                EventKind::CallRequested {
                    call_id: call.call_id,
                    person_id: call.person_id,
                    person_type: call.person_type,
                    origin: call.origin,
                    destination: call.destination,
                    direction: call.direction,
                },
            ));
            elevators.submit_call(call.clone());

            let floor = building.get_floor_mut(call.origin)?;
            floor.enqueue(call.direction, call.person_id);
            self.bus.publish(&DomainEvent::new(
                now,
                SOURCE,
                EventKind::QueueSizeChanged {
                    floor: call.origin,
                    direction: call.direction,
                    new_queue_size: floor.waiting(call.direction),
                },
            ));
        }
        Ok(())
    }

    // ── Fresh arrivals ────────────────────────────────────────────────────

    fn generate_arrivals(
        &mut self,
        building: &mut Building,
        elevators: &mut ElevatorController,
        now: f64,
    ) -> TrafficResult<()> {
        // A single-floor building has no destinations to travel to.
        if building.floor_count() < 2 {
            return Ok(());
        }
        for idx in 0..self.profiles.len() {
            if self.next_arrival[idx].is_none() {
                self.next_arrival[idx] = Some(self.sample_next(idx, now));
            }

            while let Some(at) = self.next_arrival[idx] {
                if at > now {
                    break;
                }
                self.spawn_arrival(idx, building, elevators, now)?;
                self.next_arrival[idx] = Some(self.sample_next(idx, at));
            }
        }
        Ok(())
    }

    fn sample_next(&mut self, idx: usize, t0: f64) -> f64 {
        let curve = &self.profiles[idx].1.curve;
        next_arrival_thinning(curve, self.start_of_day_secs, t0, self.horizon_secs, &mut self.rng)
            .unwrap_or(f64::INFINITY)
    }

    /// Spawn one person of profile `idx`: lobby → sampled destination, with
    /// a return trip scheduled after a sampled stay.
    fn spawn_arrival(
        &mut self,
        idx: usize,
        building: &mut Building,
        elevators: &mut ElevatorController,
        now: f64,
    ) -> TrafficResult<()> {
        let (kind, ref profile) = self.profiles[idx];

        let person_id = PersonId(self.next_person);
        self.next_person += 1;

        let (lo, hi) = profile.dest_bounds(building.floor_count());
        let destination = self.rng.gen_range(lo..=hi);
        let stay_secs = self.rng.gen_range(profile.stay_secs.0..=profile.stay_secs.1);

        let route = Route::round_trip(destination, stay_secs)?;
        self.directory.insert(Person::spawn(person_id, kind, route));

        debug!("T={now:.1} spawn {person_id} ({kind}) -> floor {destination}, stay {stay_secs:.0}s");
        self.bus.publish(&DomainEvent::new(
            now,
            SOURCE,
            EventKind::PersonSpawned {
                person_id,
                person_type: kind,
                floor: 0,
                destination,
            },
        ));
        self.bus.publish(&DomainEvent::new(
            now,
            SOURCE,
            EventKind::PersonStateChanged {
                person_id,
                from: ev_core::PersonState::NotSpawned,
                to: ev_core::PersonState::Waiting,
            },
        ));

        // Outbound leg: lobby → destination.
        let call = CallRequest::new(
            CallId(self.next_call),
            person_id,
            kind,
            0,
            destination,
            now,
        );
        self.next_call += 1;
        self.bus.publish(&DomainEvent::new(
            now,
            SOURCE,
            EventKind::CallRequested {
                call_id: call.call_id,
                person_id,
                person_type: kind,
                origin: 0,
                destination,
                direction: call.direction,
            },
        ));
        elevators.submit_call(call);

        let lobby = building.get_floor_mut(0)?;
        lobby.enqueue_up(person_id);
        self.bus.publish(&DomainEvent::new(
            now,
            SOURCE,
            EventKind::QueueSizeChanged {
                floor: 0,
                direction: ev_core::Direction::Up,
                new_queue_size: lobby.waiting_up(),
            },
        ));

        // Return leg, due after the planned stay.
        let return_call = CallRequest::new(
            CallId(self.next_call),
            person_id,
            kind,
            destination,
            0,
            now + stay_secs,
        );
        self.next_call += 1;
        self.scheduled.push(Reverse(ScheduledReturn {
            due: now + stay_secs,
            seq: self.heap_seq,
            call: return_call,
        }));
        self.heap_seq += 1;

        Ok(())
    }
}
