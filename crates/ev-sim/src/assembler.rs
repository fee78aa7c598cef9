//! Per-tick snapshot assembly.

use ev_building::{Building, Vehicle};
use ev_core::Tick;
use ev_output::{ElevatorSnapshot, FloorQueueSnapshot, TickSnapshot};

/// Build an immutable snapshot of the building and fleet.
///
/// Every contained sequence is freshly allocated; the consumer may retain
/// the snapshot indefinitely without aliasing live state.  Floor queues are
/// read only for their lengths and never exposed.
pub fn assemble_snapshot(
    run_id: u32,
    tick: Tick,
    t: f64,
    building: &Building,
    fleet: &[Vehicle],
) -> TickSnapshot {
    TickSnapshot {
        run_id,
        tick: tick.0,
        t,
        elevators: fleet.iter().map(ElevatorSnapshot::of).collect(),
        floors: building.floors().iter().map(FloorQueueSnapshot::of).collect(),
    }
}
