//! The dispatch policy capability.

use ev_building::Vehicle;
use ev_core::VehicleId;
use ev_events::CallRequest;

/// Maps (fleet view, call) to the vehicle that should serve the call.
///
/// `select_vehicle` must be a pure function of the fleet view it is given —
/// determinism across runs depends on it.  Stateful policies (cooldown)
/// keep their state current through the two notification hooks, which the
/// controller invokes: `advance_to` every tick before any selection, and
/// `note_departure` when an assigned car leaves its pickup floor.
pub trait DispatchPolicy: Send {
    /// Choose a vehicle for `call`.  `fleet` is ordered by ascending id and
    /// is never empty.
    fn select_vehicle(&self, fleet: &[&Vehicle], call: &CallRequest) -> VehicleId;

    /// Observe the current simulation time.  Called once per tick, before
    /// any `select_vehicle` call of that tick.
    fn advance_to(&mut self, _now_secs: f64) {}

    /// Observe a car departing its pickup floor.
    fn note_departure(&mut self, _vehicle: VehicleId) {}
}
