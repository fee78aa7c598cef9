//! The tick snapshot wire types.
//!
//! Every contained sequence is a fresh copy: the consumer may hold a
//! snapshot indefinitely without aliasing live simulation state.

use serde::Serialize;

use ev_building::{Floor, Vehicle};
use ev_core::{Direction, VehicleId};

/// One line of `snapshots.ndjson`.
#[derive(Debug, Clone, Serialize)]
pub struct TickSnapshot {
    #[serde(rename = "RunId")]
    pub run_id: u32,
    #[serde(rename = "Tick")]
    pub tick: u64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "Elevators")]
    pub elevators: Vec<ElevatorSnapshot>,
    #[serde(rename = "Floors")]
    pub floors: Vec<FloorQueueSnapshot>,
}

/// Point-in-time copy of one car.
#[derive(Debug, Clone, Serialize)]
pub struct ElevatorSnapshot {
    #[serde(rename = "VehicleId")]
    pub vehicle_id: VehicleId,
    #[serde(rename = "PositionFloor")]
    pub position_floor: f64,
    #[serde(rename = "CurrentFloor")]
    pub current_floor: u32,
    #[serde(rename = "TargetFloor")]
    pub target_floor: Option<u32>,
    #[serde(rename = "Direction")]
    pub direction: Direction,
    #[serde(rename = "State")]
    pub state: &'static str,
    #[serde(rename = "Capacity")]
    pub capacity: u32,
    #[serde(rename = "OccupantCount")]
    pub occupant_count: u32,
    #[serde(rename = "StopQueueFloors")]
    pub stop_queue_floors: Vec<u32>,
}

impl ElevatorSnapshot {
    /// Deep-copy the observable state of `vehicle`.
    pub fn of(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id(),
            position_floor: vehicle.position(),
            current_floor: vehicle.current_floor(),
            target_floor: vehicle.target(),
            direction: vehicle.direction(),
            state: vehicle.state().as_str(),
            capacity: vehicle.capacity(),
            occupant_count: vehicle.occupant_count(),
            stop_queue_floors: vehicle.stop_queue().to_vec(),
        }
    }
}

/// Queue and occupancy counts for one floor.  The queues themselves are
/// never exposed, only their lengths.
#[derive(Debug, Clone, Serialize)]
pub struct FloorQueueSnapshot {
    #[serde(rename = "Floor")]
    pub floor: u32,
    #[serde(rename = "WaitingUp")]
    pub waiting_up: usize,
    #[serde(rename = "WaitingDown")]
    pub waiting_down: usize,
    #[serde(rename = "CurrentOccupantsOnFloor")]
    pub current_occupants: u32,
}

impl FloorQueueSnapshot {
    pub fn of(floor: &Floor) -> Self {
        Self {
            floor: floor.index(),
            waiting_up: floor.waiting_up(),
            waiting_down: floor.waiting_down(),
            current_occupants: floor.occupants(),
        }
    }
}
