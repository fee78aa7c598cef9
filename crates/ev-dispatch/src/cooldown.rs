//! Cooldown decorator: keep recently departed cars out of consideration.

use std::collections::HashMap;

use ev_building::Vehicle;
use ev_core::VehicleId;
use ev_events::CallRequest;

use crate::DispatchPolicy;

/// Default minimum time between a car's pickup departure and its next
/// consideration for a new call.
pub const DEFAULT_COOLDOWN_SECS: f64 = 3.0;

/// Wraps an inner policy and filters out vehicles still inside their
/// cooldown window.
///
/// If the filter would empty the candidate list, the full fleet view is
/// passed through instead — a cooling fleet must never starve a call.
/// The decorator learns the current time through `advance_to` and pickup
/// departures through `note_departure`; both come from the controller.
pub struct CooldownPolicy {
    inner: Box<dyn DispatchPolicy>,
    cooldown_secs: f64,
    departed_at: HashMap<VehicleId, f64>,
    now_secs: f64,
}

impl CooldownPolicy {
    pub fn new(inner: Box<dyn DispatchPolicy>, cooldown_secs: f64) -> Self {
        Self {
            inner,
            cooldown_secs,
            departed_at: HashMap::new(),
            now_secs: 0.0,
        }
    }

    /// Wrap `inner` with the default 3 s cooldown.
    pub fn with_default(inner: Box<dyn DispatchPolicy>) -> Self {
        Self::new(inner, DEFAULT_COOLDOWN_SECS)
    }

    fn is_cooling(&self, vehicle: VehicleId) -> bool {
        match self.departed_at.get(&vehicle) {
            Some(&departed) => departed + self.cooldown_secs > self.now_secs,
            None => false,
        }
    }
}

impl DispatchPolicy for CooldownPolicy {
    fn select_vehicle(&self, fleet: &[&Vehicle], call: &CallRequest) -> VehicleId {
        let eligible: Vec<&Vehicle> = fleet
            .iter()
            .copied()
            .filter(|v| !self.is_cooling(v.id()))
            .collect();

        if eligible.is_empty() {
            // Anti-starvation: every car is cooling, so fall through to the
            // unfiltered fleet and let the inner policy decide.
            self.inner.select_vehicle(fleet, call)
        } else {
            self.inner.select_vehicle(&eligible, call)
        }
    }

    fn advance_to(&mut self, now_secs: f64) {
        self.now_secs = now_secs;
        self.inner.advance_to(now_secs);
    }

    fn note_departure(&mut self, vehicle: VehicleId) {
        self.departed_at.insert(vehicle, self.now_secs);
        self.inner.note_departure(vehicle);
    }
}
