//! The basic nearest-idle policy.

use ev_building::{Vehicle, VehicleState};
use ev_core::VehicleId;
use ev_events::CallRequest;

use crate::DispatchPolicy;

/// Order candidates by (idle first, distance to origin, id ascending) and
/// take the first.
///
/// Purely a function of fleet state at call time.  The id-ascending tie
/// break keeps assignment reproducible when two cars are equally good.
#[derive(Debug, Default)]
pub struct NearestIdlePolicy;

impl DispatchPolicy for NearestIdlePolicy {
    fn select_vehicle(&self, fleet: &[&Vehicle], call: &CallRequest) -> VehicleId {
        fleet
            .iter()
            .min_by_key(|v| {
                let busy = (v.state() != VehicleState::Idle) as u8;
                let distance = (v.current_floor() as i64 - call.origin as i64).abs();
                (busy, distance, v.id())
            })
            .map(|v| v.id())
            .unwrap_or(VehicleId::INVALID)
    }
}
