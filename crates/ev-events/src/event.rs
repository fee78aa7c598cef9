//! The domain event tagged union.
//!
//! Every observable state change in the simulation is announced as one of
//! these variants.  The output crate adapts them into wire records; the
//! metrics aggregator and the person directory consume them directly.

use ev_building::VehicleState;
use ev_core::{CallId, Direction, PersonId, PersonState, PersonType, VehicleId};

/// An event plus its envelope: when it happened and who emitted it.
#[derive(Debug, Clone)]
pub struct DomainEvent {
    /// Simulation time of the event, in seconds.
    pub t: f64,
    /// Human-readable emitter, e.g. `"controller"` or `"traffic"`.
    pub source: &'static str,
    pub kind: EventKind,
}

impl DomainEvent {
    pub fn new(t: f64, source: &'static str, kind: EventKind) -> Self {
        Self { t, source, kind }
    }
}

/// The payload union.  Field names follow the wire schema (see `ev-output`).
#[derive(Debug, Clone)]
pub enum EventKind {
    RunStarted {
        floor_count: u32,
        elevator_count: u32,
        random_seed: u64,
        planned_duration_secs: f64,
        scenario_name: String,
        /// Wire-schema version, `"Major.Minor"`.
        contract_version: &'static str,
    },
    RunEnded {
        total_people: u64,
        total_calls_completed: u64,
    },
    PersonSpawned {
        person_id: PersonId,
        person_type: PersonType,
        floor: u32,
        destination: u32,
    },
    PersonStateChanged {
        person_id: PersonId,
        from: PersonState,
        to: PersonState,
    },
    CallRequested {
        call_id: CallId,
        person_id: PersonId,
        person_type: PersonType,
        origin: u32,
        destination: u32,
        direction: Direction,
    },
    CallAssigned {
        call_id: CallId,
        vehicle_id: VehicleId,
        /// Unknown until a travel-time estimator exists; always NaN.
        estimated_pickup_t: f64,
    },
    ElevatorArrived {
        vehicle_id: VehicleId,
        floor: u32,
    },
    DoorsOpened {
        vehicle_id: VehicleId,
        floor: u32,
    },
    DoorsClosed {
        vehicle_id: VehicleId,
        floor: u32,
    },
    PersonBoarded {
        person_id: PersonId,
        call_id: CallId,
        vehicle_id: VehicleId,
        floor: u32,
        vehicle_occupant_count_after: u32,
    },
    PersonAlighted {
        person_id: PersonId,
        call_id: CallId,
        vehicle_id: VehicleId,
        floor: u32,
        vehicle_occupant_count_after: u32,
    },
    /// The car arrived at a pickup with no room left; the call goes back to
    /// the tail of the pending queue.
    CapacityHit {
        call_id: CallId,
        person_id: PersonId,
        vehicle_id: VehicleId,
        floor: u32,
        vehicle_occupant_count: u32,
        vehicle_capacity: u32,
    },
    VehicleStateChanged {
        vehicle_id: VehicleId,
        from: VehicleState,
        to: VehicleState,
    },
    QueueSizeChanged {
        floor: u32,
        direction: Direction,
        new_queue_size: usize,
    },
}

impl EventKind {
    /// The wire type tag for this event.
    pub fn type_tag(&self) -> &'static str {
        match self {
            EventKind::RunStarted { .. }          => "RunStarted",
            EventKind::RunEnded { .. }            => "RunEnded",
            EventKind::PersonSpawned { .. }       => "PersonSpawned",
            EventKind::PersonStateChanged { .. }  => "PersonStateChanged",
            EventKind::CallRequested { .. }       => "CallRequested",
            EventKind::CallAssigned { .. }        => "CallAssigned",
            EventKind::ElevatorArrived { .. }     => "ElevatorArrived",
            EventKind::DoorsOpened { .. }         => "DoorsOpened",
            EventKind::DoorsClosed { .. }         => "DoorsClosed",
            EventKind::PersonBoarded { .. }       => "PersonBoarded",
            EventKind::PersonAlighted { .. }      => "PersonAlighted",
            EventKind::CapacityHit { .. }         => "CapacityHit",
            EventKind::VehicleStateChanged { .. } => "VehicleStateChanged",
            EventKind::QueueSizeChanged { .. }    => "QueueSizeChanged",
        }
    }
}
