//! Simulation time model.
//!
//! # Design
//!
//! The canonical time unit is a monotonically increasing `Tick` counter; the
//! mapping to simulated seconds lives in `SimClock`:
//!
//!   sim_seconds = tick * dt_secs
//!
//! Ticks advance by exactly one per loop iteration, so sim time advances
//! monotonically by `dt_secs` and never jumps backwards.  Arrival-rate
//! curves are defined over a 24-hour day; `time_of_day_secs` maps the
//! elapsed run time onto that day starting from `start_of_day_secs`.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Seconds in one simulated day.
pub const SECS_PER_DAY: f64 = 86_400.0;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// Cheap to copy; holds no heap data.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Simulated seconds one tick represents.
    pub dt_secs: f64,
    /// Time-of-day (seconds after midnight) at tick 0.
    pub start_of_day_secs: f64,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f64, start_of_day_secs: f64) -> Self {
        Self {
            dt_secs,
            start_of_day_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.  This is the `T` carried by
    /// every event and snapshot record.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt_secs
    }

    /// Seconds after midnight on the simulated day, wrapping at 24 h.
    /// Arrival-rate curves are evaluated at this time.
    #[inline]
    pub fn time_of_day_secs(&self) -> f64 {
        (self.start_of_day_secs + self.elapsed_secs()) % SECS_PER_DAY
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tod = self.time_of_day_secs();
        let h = (tod / 3_600.0) as u32;
        let m = ((tod % 3_600.0) / 60.0) as u32;
        write!(f, "{} ({:02}:{:02})", self.current_tick, h, m)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically assembled by the launching application and passed to
/// `SimBuilder`.  `validate()` is called there; a config that fails
/// validation never becomes a running simulation.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SimConfig {
    /// Number of floors in the building.  The lobby is floor 0.
    pub floor_count: u32,

    /// Number of elevator cars.  Fleet IDs are 1..=elevator_count.
    pub elevator_count: u32,

    /// Capacity of every car, in persons.
    pub vehicle_capacity: u32,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Total simulated seconds to run.
    pub duration_secs: f64,

    /// Time-of-day (seconds after midnight) at which the run starts.
    pub start_of_day_secs: f64,

    /// Simulated seconds per tick.
    pub dt_secs: f64,

    /// Car speed in floors per second.
    pub floor_speed: f64,

    /// Identifier stamped on every emitted record.
    pub run_id: u32,

    /// Human-readable scenario label carried in the RunStarted record.
    pub scenario_name: String,
}

impl SimConfig {
    /// Check input validity.  Violations are programmer errors in the
    /// launching application; a failing config must not be run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.floor_count < 1 {
            return Err(CoreError::Config("floor_count must be >= 1".into()));
        }
        if self.elevator_count < 1 {
            return Err(CoreError::Config("elevator_count must be >= 1".into()));
        }
        if self.vehicle_capacity < 1 {
            return Err(CoreError::Config("vehicle_capacity must be >= 1".into()));
        }
        if !(self.dt_secs > 0.0) {
            return Err(CoreError::Config("dt_secs must be > 0".into()));
        }
        if self.duration_secs < 0.0 {
            return Err(CoreError::Config("duration_secs must be >= 0".into()));
        }
        if !(self.floor_speed > 0.0) {
            return Err(CoreError::Config("floor_speed must be > 0".into()));
        }
        if !(0.0..SECS_PER_DAY).contains(&self.start_of_day_secs) {
            return Err(CoreError::Config(
                "start_of_day_secs must be in [0, 86400)".into(),
            ));
        }
        Ok(())
    }

    /// Number of ticks in the run (rounds up so the full duration is covered).
    #[inline]
    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs / self.dt_secs).ceil() as u64
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs, self.start_of_day_secs)
    }
}
