//! The event wire record.
//!
//! One `EventRecord` per domain event, serialized as a single JSON object
//! per NDJSON line.  Field names are part of the external contract and use
//! PascalCase; the contract version travels in every `RunStarted` payload.

use serde::Serialize;

use ev_core::{CallId, Direction, PersonId, PersonState, PersonType, VehicleId};
use ev_building::VehicleState;
use ev_events::{DomainEvent, EventKind};

/// Wire-schema version carried in `RunStarted`.
pub const CONTRACT_VERSION: &str = "1.0";

/// One line of `events.ndjson`.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    #[serde(rename = "RunId")]
    pub run_id: u32,
    /// Strictly monotonic within a run, starting at 1.
    #[serde(rename = "Sequence")]
    pub sequence: u64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "Type")]
    pub event_type: &'static str,
    #[serde(rename = "Source")]
    pub source: &'static str,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Payload")]
    pub payload: Payload,
}

impl EventRecord {
    /// Adapt a domain event into its wire form.
    ///
    /// `sequence` is assigned by the caller (the recorder), which is the
    /// single place the contiguity invariant lives.
    pub fn from_domain(run_id: u32, sequence: u64, event: &DomainEvent) -> Self {
        let (message, payload) = describe(&event.kind);
        Self {
            run_id,
            sequence,
            t: event.t,
            event_type: event.kind.type_tag(),
            source: event.source,
            message,
            payload,
        }
    }
}

/// Type-specific payload objects.  Untagged: the enclosing record's `Type`
/// field is the discriminator.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    RunStarted {
        #[serde(rename = "FloorCount")]
        floor_count: u32,
        #[serde(rename = "ElevatorCount")]
        elevator_count: u32,
        #[serde(rename = "RandomSeed")]
        random_seed: u64,
        #[serde(rename = "PlannedDurationSeconds")]
        planned_duration_secs: f64,
        #[serde(rename = "ScenarioName")]
        scenario_name: String,
        #[serde(rename = "ContractVersion")]
        contract_version: &'static str,
    },
    RunEnded {
        #[serde(rename = "TotalPeople")]
        total_people: u64,
        #[serde(rename = "TotalCallsCompleted")]
        total_calls_completed: u64,
    },
    PersonSpawned {
        #[serde(rename = "PersonId")]
        person_id: PersonId,
        #[serde(rename = "PersonType")]
        person_type: PersonType,
        #[serde(rename = "Floor")]
        floor: u32,
        #[serde(rename = "Destination")]
        destination: u32,
    },
    PersonStateChanged {
        #[serde(rename = "PersonId")]
        person_id: PersonId,
        #[serde(rename = "From")]
        from: PersonState,
        #[serde(rename = "To")]
        to: PersonState,
    },
    CallRequested {
        #[serde(rename = "CallId")]
        call_id: CallId,
        #[serde(rename = "PersonId")]
        person_id: PersonId,
        #[serde(rename = "PersonType")]
        person_type: PersonType,
        #[serde(rename = "Origin")]
        origin: u32,
        #[serde(rename = "Destination")]
        destination: u32,
        #[serde(rename = "Direction")]
        direction: Direction,
    },
    CallAssigned {
        #[serde(rename = "CallId")]
        call_id: CallId,
        #[serde(rename = "VehicleId")]
        vehicle_id: VehicleId,
        /// NaN serializes as JSON null ("unknown").
        #[serde(rename = "EstimatedPickupT")]
        estimated_pickup_t: f64,
    },
    /// Shared by ElevatorArrived, DoorsOpened, and DoorsClosed.
    VehicleAtFloor {
        #[serde(rename = "VehicleId")]
        vehicle_id: VehicleId,
        #[serde(rename = "Floor")]
        floor: u32,
    },
    /// Shared by PersonBoarded and PersonAlighted.
    PersonTransfer {
        #[serde(rename = "PersonId")]
        person_id: PersonId,
        #[serde(rename = "CallId")]
        call_id: CallId,
        #[serde(rename = "VehicleId")]
        vehicle_id: VehicleId,
        #[serde(rename = "Floor")]
        floor: u32,
        #[serde(rename = "VehicleOccupantCountAfter")]
        vehicle_occupant_count_after: u32,
    },
    CapacityHit {
        #[serde(rename = "CallId")]
        call_id: CallId,
        #[serde(rename = "PersonId")]
        person_id: PersonId,
        #[serde(rename = "VehicleId")]
        vehicle_id: VehicleId,
        #[serde(rename = "Floor")]
        floor: u32,
        #[serde(rename = "VehicleOccupantCount")]
        vehicle_occupant_count: u32,
        #[serde(rename = "VehicleCapacity")]
        vehicle_capacity: u32,
    },
    VehicleStateChanged {
        #[serde(rename = "VehicleId")]
        vehicle_id: VehicleId,
        #[serde(rename = "From")]
        from: VehicleState,
        #[serde(rename = "To")]
        to: VehicleState,
    },
    QueueSizeChanged {
        #[serde(rename = "Floor")]
        floor: u32,
        #[serde(rename = "Direction")]
        direction: Direction,
        #[serde(rename = "NewQueueSize")]
        new_queue_size: usize,
    },
}

/// Build the human message and the payload for one event kind.
fn describe(kind: &EventKind) -> (String, Payload) {
    match *kind {
        EventKind::RunStarted {
            floor_count,
            elevator_count,
            random_seed,
            planned_duration_secs,
            ref scenario_name,
            contract_version,
        } => (
            format!("run started: {floor_count} floors, {elevator_count} elevators"),
            Payload::RunStarted {
                floor_count,
                elevator_count,
                random_seed,
                planned_duration_secs,
                scenario_name: scenario_name.clone(),
                contract_version,
            },
        ),
        EventKind::RunEnded { total_people, total_calls_completed } => (
            format!("run ended: {total_people} people, {total_calls_completed} calls completed"),
            Payload::RunEnded { total_people, total_calls_completed },
        ),
        EventKind::PersonSpawned { person_id, person_type, floor, destination } => (
            format!("person {} ({person_type}) spawned at floor {floor}, headed to {destination}", person_id.0),
            Payload::PersonSpawned { person_id, person_type, floor, destination },
        ),
        EventKind::PersonStateChanged { person_id, from, to } => (
            format!("person {} {from} -> {to}", person_id.0),
            Payload::PersonStateChanged { person_id, from, to },
        ),
        EventKind::CallRequested { call_id, person_id, person_type, origin, destination, direction } => (
            format!("call {}: person {} floor {origin} -> {destination}", call_id.0, person_id.0),
            Payload::CallRequested { call_id, person_id, person_type, origin, destination, direction },
        ),
        EventKind::CallAssigned { call_id, vehicle_id, estimated_pickup_t } => (
            format!("call {} assigned to vehicle {}", call_id.0, vehicle_id.0),
            Payload::CallAssigned { call_id, vehicle_id, estimated_pickup_t },
        ),
        EventKind::ElevatorArrived { vehicle_id, floor } => (
            format!("vehicle {} arrived at floor {floor}", vehicle_id.0),
            Payload::VehicleAtFloor { vehicle_id, floor },
        ),
        EventKind::DoorsOpened { vehicle_id, floor } => (
            format!("vehicle {} doors opened at floor {floor}", vehicle_id.0),
            Payload::VehicleAtFloor { vehicle_id, floor },
        ),
        EventKind::DoorsClosed { vehicle_id, floor } => (
            format!("vehicle {} doors closed at floor {floor}", vehicle_id.0),
            Payload::VehicleAtFloor { vehicle_id, floor },
        ),
        EventKind::PersonBoarded { person_id, call_id, vehicle_id, floor, vehicle_occupant_count_after } => (
            format!(
                "person {} boarded vehicle {} at floor {floor} ({vehicle_occupant_count_after} aboard)",
                person_id.0, vehicle_id.0
            ),
            Payload::PersonTransfer {
                person_id, call_id, vehicle_id, floor, vehicle_occupant_count_after,
            },
        ),
        EventKind::PersonAlighted { person_id, call_id, vehicle_id, floor, vehicle_occupant_count_after } => (
            format!(
                "person {} left vehicle {} at floor {floor} ({vehicle_occupant_count_after} aboard)",
                person_id.0, vehicle_id.0
            ),
            Payload::PersonTransfer {
                person_id, call_id, vehicle_id, floor, vehicle_occupant_count_after,
            },
        ),
        EventKind::CapacityHit {
            call_id, person_id, vehicle_id, floor, vehicle_occupant_count, vehicle_capacity,
        } => (
            format!("vehicle {} full at floor {floor}; call {} re-queued", vehicle_id.0, call_id.0),
            Payload::CapacityHit {
                call_id, person_id, vehicle_id, floor, vehicle_occupant_count, vehicle_capacity,
            },
        ),
        EventKind::VehicleStateChanged { vehicle_id, from, to } => (
            format!("vehicle {} {} -> {}", vehicle_id.0, from.as_str(), to.as_str()),
            Payload::VehicleStateChanged { vehicle_id, from, to },
        ),
        EventKind::QueueSizeChanged { floor, direction, new_queue_size } => (
            format!("floor {floor} {direction} queue now {new_queue_size}"),
            Payload::QueueSizeChanged { floor, direction, new_queue_size },
        ),
    }
}
