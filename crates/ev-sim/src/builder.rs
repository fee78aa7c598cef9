//! Fluent builder for constructing a [`Sim`].

use std::path::PathBuf;
use std::sync::Arc;

use ev_building::{Building, Vehicle};
use ev_control::ElevatorController;
use ev_core::{PersonType, SimConfig, VehicleId};
use ev_dispatch::{CooldownPolicy, DispatchPolicy, NearestIdlePolicy};
use ev_events::EventBus;
use ev_metrics::MetricsAggregator;
use ev_output::Pipeline;
use ev_traffic::{PassengerController, PersonDirectory, TrafficProfile};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required input
///
/// - [`SimConfig`] — validated in [`build`](SimBuilder::build); an invalid
///   config never becomes a running simulation.
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                          |
/// |------------------|--------------------------------------------------|
/// | `.profiles(v)`   | [`TrafficProfile::defaults`]                     |
/// | `.policy(p)`     | nearest-idle wrapped in the cooldown decorator   |
/// | `.output_dir(d)` | no pipeline (no NDJSON output)                   |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .output_dir("./out".into())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    profiles: Option<Vec<(PersonType, TrafficProfile)>>,
    policy: Option<Box<dyn DispatchPolicy>>,
    output_dir: Option<PathBuf>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            profiles: None,
            policy: None,
            output_dir: None,
        }
    }

    /// Supply per-type traffic profiles (arrival curves, destination and
    /// stay ranges).
    pub fn profiles(mut self, profiles: Vec<(PersonType, TrafficProfile)>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Supply the dispatch policy.
    pub fn policy(mut self, policy: Box<dyn DispatchPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Write `events.ndjson` and `snapshots.ndjson` into `dir`.
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Validate the config and wire the whole system together.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let config = self.config;

        let bus = EventBus::new();

        // The recorder must be the bus's first subscriber: sequence numbers
        // are assigned in subscription order, and handlers further down the
        // list publish follow-up events of their own.
        let pipeline = match &self.output_dir {
            Some(dir) => Some(Pipeline::create(dir, config.run_id, &bus)?),
            None => None,
        };

        let metrics = MetricsAggregator::new();
        let directory = PersonDirectory::new();
        let subs = vec![metrics.attach(&bus), directory.attach(&bus)];

        let building = Building::new(config.floor_count)?;
        let fleet: Vec<Vehicle> = (1..=config.elevator_count)
            .map(|id| Vehicle::new(VehicleId(id), config.vehicle_capacity))
            .collect::<Result<_, _>>()?;

        let policy = self
            .policy
            .unwrap_or_else(|| Box::new(CooldownPolicy::with_default(Box::new(NearestIdlePolicy))));
        let elevators = ElevatorController::new(fleet, policy, Arc::clone(&bus));

        let profiles = self.profiles.unwrap_or_else(TrafficProfile::defaults);
        let traffic = PassengerController::new(
            config.seed,
            profiles,
            config.start_of_day_secs,
            Arc::clone(&directory),
            Arc::clone(&bus),
        );

        let clock = config.make_clock();
        Ok(Sim {
            config,
            clock,
            building,
            elevators,
            traffic,
            metrics,
            directory,
            bus,
            pipeline,
            _subs: subs,
        })
    }
}
