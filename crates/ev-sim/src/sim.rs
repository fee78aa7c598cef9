//! The `Sim` struct and its fixed-step loop.

use std::sync::Arc;

use log::info;

use ev_building::Building;
use ev_control::ElevatorController;
use ev_core::{SimClock, SimConfig, Tick};
use ev_events::{CallRequest, DomainEvent, EventBus, EventKind, Subscription};
use ev_metrics::MetricsAggregator;
use ev_output::{Pipeline, CONTRACT_VERSION};
use ev_traffic::{PassengerController, PersonDirectory};

use crate::{assemble_snapshot, SimObserver, SimResult};

const SOURCE: &str = "sim";

/// The simulation driver.
///
/// Owns all domain state exclusively; the tick loop is strictly
/// single-threaded and cooperative.  Create via
/// [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub(crate) config: SimConfig,
    pub(crate) clock: SimClock,
    pub(crate) building: Building,
    pub(crate) elevators: ElevatorController,
    pub(crate) traffic: PassengerController,
    pub(crate) metrics: Arc<MetricsAggregator>,
    pub(crate) directory: Arc<PersonDirectory>,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) pipeline: Option<Pipeline>,
    /// Keeps the metrics and directory handlers registered for the run.
    pub(crate) _subs: Vec<Subscription>,
}

impl Sim {
    // ── Read accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn elevators(&self) -> &ElevatorController {
        &self.elevators
    }

    pub fn metrics(&self) -> &Arc<MetricsAggregator> {
        &self.metrics
    }

    pub fn directory(&self) -> &Arc<PersonDirectory> {
        &self.directory
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    // ── External call injection ───────────────────────────────────────────

    /// Submit a call from outside the arrival process (scenario drivers,
    /// tests).  Mirrors what the passenger controller does for its own
    /// calls: announce, queue the person on the floor, hand to dispatch.
    pub fn submit_call(&mut self, call: CallRequest) -> SimResult<()> {
        let now = self.clock.elapsed_secs();
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
        let floor = self.building.get_floor_mut(call.origin)?;
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
        self.elevators.submit_call(call);
        Ok(())
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run the full configured duration, bracketed by `RunStarted` and
    /// `RunEnded`, then shut the pipeline down.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            "run {} starting: {} floors, {} cars, seed {}",
            self.config.run_id, self.config.floor_count, self.config.elevator_count,
            self.config.seed
        );
        self.bus.publish(&DomainEvent::new(
            self.clock.elapsed_secs(),
            SOURCE,
            EventKind::RunStarted {
                floor_count: self.config.floor_count,
                elevator_count: self.config.elevator_count,
                random_seed: self.config.seed,
                planned_duration_secs: self.config.duration_secs,
                scenario_name: self.config.scenario_name.clone(),
                contract_version: CONTRACT_VERSION,
            },
        ));

        let total = self.config.total_ticks();
        while self.clock.current_tick.0 < total {
            self.step(observer)?;
        }

        let final_t = self.clock.elapsed_secs();
        self.bus.publish(&DomainEvent::new(
            final_t,
            SOURCE,
            EventKind::RunEnded {
                total_people: self.directory.spawned_total(),
                total_calls_completed: self.elevators.calls_completed(),
            },
        ));
        observer.on_run_end(self.clock.current_tick, final_t);
        info!("run {} ended at T={final_t:.1}", self.config.run_id);

        if let Some(pipeline) = &mut self.pipeline {
            pipeline.shutdown();
        }
        Ok(())
    }

    /// Run exactly `n` ticks from the current position, without the
    /// run-started/ended bracketing.  Useful for tests and incremental
    /// stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// One tick: passengers, controller, mechanics, snapshot, advance.
    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick;
        let now = self.clock.elapsed_secs();
        observer.on_tick_start(tick, now);

        self.traffic.tick(&mut self.building, &mut self.elevators, now)?;
        self.elevators.tick(&mut self.building, now)?;
        self.elevators
            .update_vehicles(self.config.dt_secs, self.config.floor_speed, now);

        let snapshot = assemble_snapshot(
            self.config.run_id,
            tick,
            now,
            &self.building,
            self.elevators.fleet(),
        );
        if let Some(pipeline) = &self.pipeline {
            pipeline.offer_snapshot(snapshot);
        }

        observer.on_tick_end(tick, now);
        self.clock.advance();
        Ok(())
    }

    /// Current tick, for callers stepping with [`run_ticks`](Sim::run_ticks).
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }
}
