//! The per-vehicle active assignment record.

use ev_events::CallRequest;

/// Progress of one assignment from pickup to completion.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AssignmentPhase {
    GoingToPickup,
    PickupDwell,
    Boarding,
    GoingToDropoff,
    DropoffDwell,
    Unloading,
    Complete,
}

/// Controller-internal record binding a call (and the co-directional batch
/// boarded with it) to one vehicle for the duration of pickup-to-dropoff.
///
/// At most one of these exists per vehicle.  The `*_dwell_armed` flags
/// remember that the door timer has been started so a dwell is armed exactly
/// once per stop; `dropoff_dwell_armed` is reset on every re-target so each
/// subsequent stop dwells again.
#[derive(Debug, Clone)]
pub struct ActiveAssignment {
    /// The call that triggered the assignment.
    pub primary: CallRequest,
    pub phase: AssignmentPhase,
    pub pickup_dwell_armed: bool,
    pub dropoff_dwell_armed: bool,
    /// Calls boarded at the pickup (primary + batch), in boarding order.
    /// Drained as their destinations are served.
    pub boarded: Vec<CallRequest>,
    /// First dropoff target, recorded when boarding finishes.
    pub next_target: Option<u32>,
}

impl ActiveAssignment {
    pub fn new(primary: CallRequest) -> Self {
        Self {
            primary,
            phase: AssignmentPhase::GoingToPickup,
            pickup_dwell_armed: false,
            dropoff_dwell_armed: false,
            boarded: Vec::new(),
            next_target: None,
        }
    }
}
