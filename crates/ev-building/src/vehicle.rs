//! Car mechanics: continuous position, motion toward a target, and timed
//! service sub-states.
//!
//! The vehicle deliberately knows nothing about calls or assignments.  The
//! controller owns all timing semantics (dwell seconds, per-person load
//! rates); the vehicle only counts timers down and moves.  The automatic
//! transition to `DoorsOpen` on arrival is the handshake that lets the
//! controller detect arrival without scanning position deltas.

use ev_core::{Direction, PersonId, VehicleId};

use crate::{BuildingError, BuildingResult};

/// Position tolerance for arrival detection.  Within this of the target the
/// position snaps to the exact floor.
const ARRIVAL_EPSILON: f64 = 1e-6;

/// Seconds of loading time per boarding person.
pub const BOARD_SECS_PER_PERSON: f64 = 1.0;

/// Seconds of unloading time per alighting person.
pub const UNLOAD_SECS_PER_PERSON: f64 = 0.5;

/// Mechanical state of a car.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum VehicleState {
    Idle,
    Moving,
    DoorsOpen,
    Loading,
    Unloading,
    OutOfService,
}

impl VehicleState {
    /// The wire form used in NDJSON records.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleState::Idle         => "Idle",
            VehicleState::Moving       => "Moving",
            VehicleState::DoorsOpen    => "DoorsOpen",
            VehicleState::Loading      => "Loading",
            VehicleState::Unloading    => "Unloading",
            VehicleState::OutOfService => "OutOfService",
        }
    }
}

/// One elevator car.
///
/// Lives for the whole run.  The occupant list never exceeds `capacity`;
/// violating that is a programmer error and panics.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    capacity: u32,
    /// Continuous floor position; floor 3.5 is halfway between 3 and 4.
    position: f64,
    target: Option<u32>,
    direction: Direction,
    state: VehicleState,
    onboard: Vec<PersonId>,
    /// Seconds remaining in the current timed state (doors/loading/unloading).
    state_time_left: f64,
    /// Remaining planned stop floors, maintained by the controller and
    /// copied into snapshots.
    stop_queue: Vec<u32>,
}

impl Vehicle {
    /// Create a car at the lobby.  Fails on a zero id or zero capacity.
    pub fn new(id: VehicleId, capacity: u32) -> BuildingResult<Self> {
        if !id.is_valid() {
            return Err(BuildingError::InvalidVehicleId(id));
        }
        if capacity < 1 {
            return Err(BuildingError::InvalidCapacity(id));
        }
        Ok(Self {
            id,
            capacity,
            position: 0.0,
            target: None,
            direction: Direction::Idle,
            state: VehicleState::Idle,
            onboard: Vec::new(),
            state_time_left: 0.0,
            stop_queue: Vec::new(),
        })
    }

    // ── Read accessors ────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Nearest whole floor to the continuous position (ties away from zero).
    #[inline]
    pub fn current_floor(&self) -> u32 {
        self.position.round() as u32
    }

    #[inline]
    pub fn target(&self) -> Option<u32> {
        self.target
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn state(&self) -> VehicleState {
        self.state
    }

    #[inline]
    pub fn state_time_left(&self) -> f64 {
        self.state_time_left
    }

    pub fn onboard(&self) -> &[PersonId] {
        &self.onboard
    }

    #[inline]
    pub fn occupant_count(&self) -> u32 {
        self.onboard.len() as u32
    }

    #[inline]
    pub fn capacity_remaining(&self) -> u32 {
        self.capacity - self.occupant_count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupant_count() >= self.capacity
    }

    pub fn stop_queue(&self) -> &[u32] {
        &self.stop_queue
    }

    pub fn set_stop_queue(&mut self, stops: Vec<u32>) {
        self.stop_queue = stops;
    }

    // ── Commands (controller-driven) ──────────────────────────────────────

    /// Send the car toward `floor`.
    ///
    /// If the car is already at `floor`, it transitions directly to
    /// `DoorsOpen` with zero dwell — the same handshake an actual arrival
    /// produces, so the controller's arrival detection works either way.
    pub fn set_target(&mut self, floor: u32) {
        if floor == self.current_floor() {
            self.position = floor as f64;
            self.target = None;
            self.direction = Direction::Idle;
            self.state = VehicleState::DoorsOpen;
            self.state_time_left = 0.0;
            return;
        }
        self.target = Some(floor);
        self.direction = if (floor as f64) > self.position {
            Direction::Up
        } else {
            Direction::Down
        };
        self.state = VehicleState::Moving;
        self.state_time_left = 0.0;
    }

    /// Hold the doors open for `seconds` (clamped to >= 0).
    pub fn begin_door_dwell(&mut self, seconds: f64) {
        self.state = VehicleState::DoorsOpen;
        self.direction = Direction::Idle;
        self.state_time_left = seconds.max(0.0);
    }

    /// Start loading `n` boarders (1.0 s each).
    pub fn begin_boarding(&mut self, n: usize) {
        self.state = VehicleState::Loading;
        self.state_time_left = n as f64 * BOARD_SECS_PER_PERSON;
    }

    /// Start unloading `n` alighters (0.5 s each).
    pub fn begin_unloading(&mut self, n: usize) {
        self.state = VehicleState::Unloading;
        self.state_time_left = n as f64 * UNLOAD_SECS_PER_PERSON;
    }

    /// Close the doors and return to rest.
    pub fn close_doors_to_idle(&mut self) {
        self.state = VehicleState::Idle;
        self.direction = Direction::Idle;
        self.state_time_left = 0.0;
    }

    /// Add a passenger.
    ///
    /// # Panics
    ///
    /// Panics if the car is at capacity.  The controller checks remaining
    /// capacity before every boarding; reaching this with a full car means
    /// the occupancy invariant was already broken.
    pub fn add_passenger(&mut self, person: PersonId) {
        assert!(
            !self.is_full(),
            "{} at capacity {}: cannot board {person}",
            self.id,
            self.capacity,
        );
        self.onboard.push(person);
    }

    /// Remove a passenger by id.  Returns whether the person was onboard.
    pub fn remove_passenger(&mut self, person: PersonId) -> bool {
        match self.onboard.iter().position(|&p| p == person) {
            Some(i) => {
                self.onboard.remove(i);
                true
            }
            None => false,
        }
    }

    // ── Per-tick mechanics ────────────────────────────────────────────────

    /// Advance the car by `dt` seconds at `speed` floors per second.
    ///
    /// Timed service states count down and do not move the car.  A moving
    /// car steps toward its target without overshooting; on arrival the
    /// position snaps to the exact floor and the doors are considered
    /// opened (zero dwell — the controller arms the real dwell afterwards).
    pub fn update(&mut self, dt: f64, speed: f64) {
        match self.state {
            VehicleState::DoorsOpen | VehicleState::Loading | VehicleState::Unloading => {
                self.state_time_left = (self.state_time_left - dt).max(0.0);
            }
            VehicleState::Moving => {
                let Some(target) = self.target else { return };
                let target_pos = target as f64;
                let delta = target_pos - self.position;
                let step = (speed * dt).min(delta.abs());
                self.position += step * delta.signum();
                self.direction = if delta > 0.0 { Direction::Up } else { Direction::Down };

                if (self.position - target_pos).abs() < ARRIVAL_EPSILON {
                    self.position = target_pos;
                    self.target = None;
                    self.direction = Direction::Idle;
                    self.state = VehicleState::DoorsOpen;
                    self.state_time_left = 0.0;
                }
            }
            VehicleState::Idle | VehicleState::OutOfService => {}
        }
    }
}
