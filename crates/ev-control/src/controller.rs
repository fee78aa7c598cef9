//! The elevator controller and its per-tick procedure.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use log::debug;

use ev_building::{Building, Vehicle, VehicleState};
use ev_core::VehicleId;
use ev_dispatch::DispatchPolicy;
use ev_events::{CallRequest, DomainEvent, EventBus, EventKind};

use crate::{ActiveAssignment, AssignmentPhase, ControlResult};

/// Door open + close overhead, lumped into one dwell timer per stop.
pub const DOOR_DWELL_SECS: f64 = 2.0;

const SOURCE: &str = "controller";

/// Assigns pending calls to cars and steers each car through its
/// pickup-to-dropoff phases.
///
/// The tick procedure is strictly ordered and single-threaded:
///
/// 1. assign pending calls (head of queue first, stop when the policy picks
///    a busy car);
/// 2. step each active assignment in ascending vehicle-id order;
/// 3. drop assignments that completed.
///
/// Car mechanics advance separately in [`update_vehicles`] after the
/// assignment step, so a transition observed this tick was caused by motion
/// or timers from previous ticks.
///
/// [`update_vehicles`]: ElevatorController::update_vehicles
pub struct ElevatorController {
    fleet: Vec<Vehicle>,
    pending: VecDeque<CallRequest>,
    active: BTreeMap<VehicleId, ActiveAssignment>,
    policy: Box<dyn DispatchPolicy>,
    bus: Arc<EventBus>,
    calls_completed: u64,
}

impl ElevatorController {
    /// Take ownership of the fleet.  `fleet` must be ordered by ascending id.
    pub fn new(fleet: Vec<Vehicle>, policy: Box<dyn DispatchPolicy>, bus: Arc<EventBus>) -> Self {
        Self {
            fleet,
            pending: VecDeque::new(),
            active: BTreeMap::new(),
            policy,
            bus,
            calls_completed: 0,
        }
    }

    // ── Read accessors ────────────────────────────────────────────────────

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn assignment(&self, vehicle: VehicleId) -> Option<&ActiveAssignment> {
        self.active.get(&vehicle)
    }

    /// Calls that have reached their person-alighted event.
    pub fn calls_completed(&self) -> u64 {
        self.calls_completed
    }

    // ── Call intake ───────────────────────────────────────────────────────

    /// Queue a call for assignment.  FIFO; assignment happens on the next
    /// [`tick`](ElevatorController::tick).
    pub fn submit_call(&mut self, call: CallRequest) {
        self.pending.push_back(call);
    }

    // ── Per-tick procedure ────────────────────────────────────────────────

    /// Run one controller step at simulation time `now`.
    pub fn tick(&mut self, building: &mut Building, now: f64) -> ControlResult<()> {
        let Self {
            fleet,
            pending,
            active,
            policy,
            bus,
            calls_completed,
        } = self;

        policy.advance_to(now);

        // ── 1. Assign pending calls ───────────────────────────────────────
        //
        // Strict head-of-queue: if the policy's pick for the head call is
        // already busy, stop assigning entirely rather than skipping ahead.
        loop {
            let Some(head) = pending.front() else { break };
            let vid = {
                let views: Vec<&Vehicle> = fleet.iter().collect();
                policy.select_vehicle(&views, head)
            };
            if !vid.is_valid() || active.contains_key(&vid) {
                break;
            }
            let Some(vehicle_idx) = fleet.iter().position(|v| v.id() == vid) else { break };
            let Some(call) = pending.pop_front() else { break };

            debug!("T={now:.1} assign {} -> {vid}", call.call_id);
            bus.publish(&DomainEvent::new(
                now,
                SOURCE,
                EventKind::CallAssigned {
                    call_id: call.call_id,
                    vehicle_id: vid,
                    estimated_pickup_t: f64::NAN,
                },
            ));

            let origin = call.origin;
            with_state_event(bus, now, &mut fleet[vehicle_idx], |v| v.set_target(origin));
            active.insert(vid, ActiveAssignment::new(call));
        }

        // ── 2. Step active assignments, ascending vehicle id ──────────────
        let ids: Vec<VehicleId> = active.keys().copied().collect();
        for id in ids {
            let Some(assignment) = active.get_mut(&id) else { continue };
            let Some(vehicle) = fleet.iter_mut().find(|v| v.id() == id) else { continue };
            step_assignment(
                assignment,
                vehicle,
                pending,
                building,
                policy.as_mut(),
                bus,
                now,
                calls_completed,
            )?;
        }

        // ── 3. Drop completed assignments ─────────────────────────────────
        active.retain(|_, a| a.phase != AssignmentPhase::Complete);

        Ok(())
    }

    /// Advance every car's mechanics by `dt` at `speed` floors/second.
    /// Runs after the assignment step each tick.
    pub fn update_vehicles(&mut self, dt: f64, speed: f64, now: f64) {
        for vehicle in &mut self.fleet {
            with_state_event(&self.bus, now, vehicle, |v| v.update(dt, speed));
        }
    }
}

// ── Phase machine ─────────────────────────────────────────────────────────────

/// Step one assignment as far as it can go this tick.
///
/// Phases that consume no time chain within a single call (arrival
/// detection flows straight into dwell arming); the loop breaks whenever
/// the assignment is waiting on motion or a timer.
#[allow(clippy::too_many_arguments)]
fn step_assignment(
    a: &mut ActiveAssignment,
    vehicle: &mut Vehicle,
    pending: &mut VecDeque<CallRequest>,
    building: &mut Building,
    policy: &mut dyn DispatchPolicy,
    bus: &EventBus,
    now: f64,
    calls_completed: &mut u64,
) -> ControlResult<()> {
    loop {
        match a.phase {
            // ── Waiting for the car to reach the pickup floor ─────────────
            AssignmentPhase::GoingToPickup => {
                if vehicle.current_floor() == a.primary.origin
                    && vehicle.state() == VehicleState::DoorsOpen
                {
                    publish(bus, now, EventKind::ElevatorArrived {
                        vehicle_id: vehicle.id(),
                        floor: vehicle.current_floor(),
                    });
                    a.phase = AssignmentPhase::PickupDwell;
                    continue;
                }
                break;
            }

            // ── Door dwell at the pickup floor ────────────────────────────
            AssignmentPhase::PickupDwell => {
                if !a.pickup_dwell_armed {
                    a.pickup_dwell_armed = true;
                    vehicle.begin_door_dwell(DOOR_DWELL_SECS);
                    publish(bus, now, EventKind::DoorsOpened {
                        vehicle_id: vehicle.id(),
                        floor: vehicle.current_floor(),
                    });
                    break;
                }
                if vehicle.state_time_left() <= 0.0 {
                    a.phase = AssignmentPhase::Boarding;
                    continue;
                }
                break;
            }

            // ── Boarding ──────────────────────────────────────────────────
            AssignmentPhase::Boarding => {
                // Still loading: wait for the timer.
                if vehicle.state() == VehicleState::Loading && vehicle.state_time_left() > 0.0 {
                    break;
                }

                // Loading finished: close up and depart for the first dropoff.
                if let Some(next) = a.next_target {
                    close_doors(bus, now, vehicle);
                    policy.note_departure(vehicle.id());
                    with_state_event(bus, now, vehicle, |v| v.set_target(next));
                    a.phase = AssignmentPhase::GoingToDropoff;
                    continue;
                }

                board_batch(a, vehicle, pending, building, bus, now)?;
                break;
            }

            // ── Waiting for the car to reach a boarded destination ────────
            AssignmentPhase::GoingToDropoff => {
                let floor = vehicle.current_floor();
                if vehicle.state() == VehicleState::DoorsOpen
                    && a.boarded.iter().any(|c| c.destination == floor)
                {
                    publish(bus, now, EventKind::ElevatorArrived {
                        vehicle_id: vehicle.id(),
                        floor,
                    });
                    a.phase = AssignmentPhase::DropoffDwell;
                    continue;
                }
                break;
            }

            // ── Door dwell at a dropoff floor ─────────────────────────────
            AssignmentPhase::DropoffDwell => {
                if !a.dropoff_dwell_armed {
                    a.dropoff_dwell_armed = true;
                    vehicle.begin_door_dwell(DOOR_DWELL_SECS);
                    publish(bus, now, EventKind::DoorsOpened {
                        vehicle_id: vehicle.id(),
                        floor: vehicle.current_floor(),
                    });
                    break;
                }
                if vehicle.state_time_left() <= 0.0 {
                    a.phase = AssignmentPhase::Unloading;
                    continue;
                }
                break;
            }

            // ── Unloading ─────────────────────────────────────────────────
            AssignmentPhase::Unloading => {
                if vehicle.state() == VehicleState::Unloading {
                    if vehicle.state_time_left() > 0.0 {
                        break;
                    }
                    // Unloading finished: either done, or off to the next stop.
                    if a.boarded.is_empty() {
                        close_doors(bus, now, vehicle);
                        vehicle.set_stop_queue(Vec::new());
                        a.phase = AssignmentPhase::Complete;
                        break;
                    }
                    let next = nearest_destination(&a.boarded, vehicle.current_floor());
                    close_doors(bus, now, vehicle);
                    a.next_target = Some(next);
                    a.dropoff_dwell_armed = false;
                    vehicle.set_stop_queue(planned_stops(&a.boarded, vehicle.current_floor()));
                    with_state_event(bus, now, vehicle, |v| v.set_target(next));
                    a.phase = AssignmentPhase::GoingToDropoff;
                    break;
                }

                // First entry at this stop: everyone bound for this floor gets off.
                unload_here(a, vehicle, building, bus, now, calls_completed)?;
                break;
            }

            AssignmentPhase::Complete => break,
        }
    }
    Ok(())
}

/// Board the primary call plus any co-directional pending calls at the same
/// origin, up to remaining capacity.
fn board_batch(
    a: &mut ActiveAssignment,
    vehicle: &mut Vehicle,
    pending: &mut VecDeque<CallRequest>,
    building: &mut Building,
    bus: &EventBus,
    now: f64,
) -> ControlResult<()> {
    let origin = a.primary.origin;
    let capacity_remaining = vehicle.capacity_remaining() as usize;

    // Full car at the pickup: the one recoverable anomaly.  The primary goes
    // back to the tail of the pending queue for re-assignment.
    if capacity_remaining == 0 {
        publish(bus, now, EventKind::CapacityHit {
            call_id: a.primary.call_id,
            person_id: a.primary.person_id,
            vehicle_id: vehicle.id(),
            floor: origin,
            vehicle_occupant_count: vehicle.occupant_count(),
            vehicle_capacity: vehicle.capacity(),
        });
        pending.push_back(a.primary.clone());
        close_doors(bus, now, vehicle);
        a.phase = AssignmentPhase::Complete;
        return Ok(());
    }

    // Collect the batch: the primary, plus every pending call matching its
    // (origin, direction), preserving pending FIFO order and rebuilding the
    // queue from the leftovers.
    let mut batch = vec![a.primary.clone()];
    let mut rest = VecDeque::with_capacity(pending.len());
    while let Some(call) = pending.pop_front() {
        if batch.len() < capacity_remaining
            && call.origin == origin
            && call.direction == a.primary.direction
        {
            batch.push(call);
        } else {
            rest.push_back(call);
        }
    }
    *pending = rest;

    // Pop one queue entry per boarder.  An empty queue here means the floor
    // accounting drifted; skip rather than fail.
    let floor = building.get_floor_mut(origin)?;
    for call in &batch {
        if floor.dequeue(call.direction).is_some() {
            publish(bus, now, EventKind::QueueSizeChanged {
                floor: origin,
                direction: call.direction,
                new_queue_size: floor.waiting(call.direction),
            });
        }
    }

    // Board in batch order, re-queueing anyone who no longer fits.
    let mut boarded_now = 0usize;
    for call in batch {
        if vehicle.is_full() {
            pending.push_back(call);
            continue;
        }
        vehicle.add_passenger(call.person_id);
        publish(bus, now, EventKind::PersonBoarded {
            person_id: call.person_id,
            call_id: call.call_id,
            vehicle_id: vehicle.id(),
            floor: origin,
            vehicle_occupant_count_after: vehicle.occupant_count(),
        });
        a.boarded.push(call);
        boarded_now += 1;
    }

    // Nobody made it onboard (accounting drift): abandon the stop.
    if a.boarded.is_empty() {
        close_doors(bus, now, vehicle);
        a.phase = AssignmentPhase::Complete;
        return Ok(());
    }

    debug!("T={now:.1} {} boarded {boarded_now} at floor {origin}", vehicle.id());
    with_state_event(bus, now, vehicle, |v| v.begin_boarding(boarded_now));
    a.next_target = Some(nearest_destination(&a.boarded, origin));
    vehicle.set_stop_queue(planned_stops(&a.boarded, origin));
    Ok(())
}

/// Alight every boarded call whose destination is the current floor and
/// start the unload timer.
fn unload_here(
    a: &mut ActiveAssignment,
    vehicle: &mut Vehicle,
    building: &mut Building,
    bus: &EventBus,
    now: f64,
    calls_completed: &mut u64,
) -> ControlResult<()> {
    let here = vehicle.current_floor();
    let mut remaining = Vec::with_capacity(a.boarded.len());
    let mut alighted = 0usize;

    for call in a.boarded.drain(..) {
        if call.destination != here {
            remaining.push(call);
            continue;
        }
        vehicle.remove_passenger(call.person_id);
        // People alighting anywhere but the lobby stay on that floor until
        // their return call fires; a lobby alight leaves the building.
        if here != 0 {
            building.get_floor_mut(here)?.add_occupant();
        }
        publish(bus, now, EventKind::PersonAlighted {
            person_id: call.person_id,
            call_id: call.call_id,
            vehicle_id: vehicle.id(),
            floor: here,
            vehicle_occupant_count_after: vehicle.occupant_count(),
        });
        *calls_completed += 1;
        alighted += 1;
    }
    a.boarded = remaining;

    debug!("T={now:.1} {} unloading {alighted} at floor {here}", vehicle.id());
    with_state_event(bus, now, vehicle, |v| v.begin_unloading(alighted));
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The boarded destination nearest to `from`; ties go to the earliest
/// boarded call.  Callers guarantee `boarded` is non-empty.
fn nearest_destination(boarded: &[CallRequest], from: u32) -> u32 {
    boarded
        .iter()
        .map(|c| c.destination)
        .min_by_key(|d| (*d as i64 - from as i64).abs())
        .unwrap_or(from)
}

/// The stop floors in planned visiting order (iterated nearest-next),
/// deduplicated.
fn planned_stops(boarded: &[CallRequest], from: u32) -> Vec<u32> {
    let mut remaining: Vec<u32> = Vec::new();
    for call in boarded {
        if !remaining.contains(&call.destination) {
            remaining.push(call.destination);
        }
    }
    let mut stops = Vec::with_capacity(remaining.len());
    let mut here = from;
    while !remaining.is_empty() {
        let idx = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, d)| (**d as i64 - here as i64).abs())
            .map(|(i, _)| i)
            .unwrap_or(0);
        here = remaining.remove(idx);
        stops.push(here);
    }
    stops
}

fn publish(bus: &EventBus, now: f64, kind: EventKind) {
    bus.publish(&DomainEvent::new(now, SOURCE, kind));
}

fn close_doors(bus: &EventBus, now: f64, vehicle: &mut Vehicle) {
    let floor = vehicle.current_floor();
    publish(bus, now, EventKind::DoorsClosed {
        vehicle_id: vehicle.id(),
        floor,
    });
    with_state_event(bus, now, vehicle, |v| v.close_doors_to_idle());
}

/// Run `f` on the vehicle and publish `VehicleStateChanged` if its state
/// moved.
fn with_state_event<F: FnOnce(&mut Vehicle)>(bus: &EventBus, now: f64, vehicle: &mut Vehicle, f: F) {
    let from = vehicle.state();
    f(vehicle);
    let to = vehicle.state();
    if from != to {
        bus.publish(&DomainEvent::new(
            now,
            SOURCE,
            EventKind::VehicleStateChanged {
                vehicle_id: vehicle.id(),
                from,
                to,
            },
        ));
    }
}
