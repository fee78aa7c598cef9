//! People, their routes, and per-type traffic profiles.

use ev_core::{PersonId, PersonState, PersonType};

use crate::{RateCurve, RateSegment, TrafficError, TrafficResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// One stop on a route: the floor and how long the person plans to stay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub floor: u32,
    pub stay_secs: f64,
}

impl Destination {
    pub fn new(floor: u32, stay_secs: f64) -> TrafficResult<Self> {
        if stay_secs < 0.0 {
            return Err(TrafficError::NegativeStay(stay_secs));
        }
        Ok(Self { floor, stay_secs })
    }
}

/// An immutable, non-empty ordered sequence of destinations.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    destinations: Vec<Destination>,
}

impl Route {
    pub fn new(destinations: Vec<Destination>) -> TrafficResult<Self> {
        if destinations.is_empty() {
            return Err(TrafficError::EmptyRoute);
        }
        Ok(Self { destinations })
    }

    /// The standard round trip: lobby → `floor` (stay a while) → lobby.
    pub fn round_trip(floor: u32, stay_secs: f64) -> TrafficResult<Self> {
        Self::new(vec![
            Destination::new(floor, stay_secs)?,
            Destination::new(0, 0.0)?,
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false // a Route is non-empty by construction
    }

    pub fn get(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

/// One simulated passenger.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub kind: PersonType,
    pub current_floor: u32,
    pub route: Route,
    /// Index of the destination currently being traveled to or just reached.
    pub route_index: usize,
    pub state: PersonState,
}

impl Person {
    /// A freshly spawned person at the lobby, waiting for their first leg.
    pub fn spawn(id: PersonId, kind: PersonType, route: Route) -> Self {
        Self {
            id,
            kind,
            current_floor: 0,
            route,
            route_index: 0,
            state: PersonState::Waiting,
        }
    }

    /// `true` once the current destination is the route's last.
    pub fn on_final_leg(&self) -> bool {
        self.route_index + 1 >= self.route.len()
    }
}

// ── Traffic profiles ──────────────────────────────────────────────────────────

/// Per-type traffic shape: arrival curve, destination range, stay range.
///
/// Destination floors are sampled uniformly from `dest_floors` intersected
/// with the building height; stays uniformly from `stay_secs`.
#[derive(Debug, Clone)]
pub struct TrafficProfile {
    pub curve: RateCurve,
    pub dest_floors: (u32, u32),
    pub stay_secs: (f64, f64),
}

impl TrafficProfile {
    /// The default diurnal profile for `kind`.
    ///
    /// The shapes loosely model the three populations: residents leave in
    /// the morning and come home in the evening, office workers pile in
    /// around 08:00–09:30 with a lunch bump, shoppers trickle through the
    /// middle of the day.
    pub fn default_for(kind: PersonType) -> Self {
        let h = 3_600.0;
        match kind {
            PersonType::Resident => Self {
                curve: curve_or_silent(vec![
                    RateSegment::new(6.0 * h, 9.0 * h, 0.020),
                    RateSegment::new(9.0 * h, 16.0 * h, 0.005),
                    RateSegment::new(16.0 * h, 21.0 * h, 0.015),
                    RateSegment::new(21.0 * h, 23.0 * h, 0.004),
                ]),
                dest_floors: (1, u32::MAX),
                stay_secs: (2.0 * h, 10.0 * h),
            },
            PersonType::OfficeWorker => Self {
                curve: curve_or_silent(vec![
                    RateSegment::new(7.5 * h, 9.5 * h, 0.040),
                    RateSegment::new(9.5 * h, 12.0 * h, 0.008),
                    RateSegment::new(12.0 * h, 13.5 * h, 0.020),
                    RateSegment::new(13.5 * h, 18.0 * h, 0.006),
                ]),
                dest_floors: (2, u32::MAX),
                stay_secs: (6.0 * h, 9.5 * h),
            },
            PersonType::Shopper => Self {
                curve: curve_or_silent(vec![
                    RateSegment::new(10.0 * h, 18.0 * h, 0.025),
                    RateSegment::new(18.0 * h, 20.0 * h, 0.008),
                ]),
                dest_floors: (1, 5),
                stay_secs: (0.5 * h, 2.0 * h),
            },
        }
    }

    /// All default profiles in `PersonType::ALL` order.
    pub fn defaults() -> Vec<(PersonType, TrafficProfile)> {
        PersonType::ALL
            .iter()
            .map(|&kind| (kind, TrafficProfile::default_for(kind)))
            .collect()
    }

    /// Clamp the destination range to a building with `floor_count` floors
    /// and sample bounds `(lo, hi)` with `1 <= lo <= hi <= top`.
    pub fn dest_bounds(&self, floor_count: u32) -> (u32, u32) {
        let top = floor_count.saturating_sub(1).max(1);
        let lo = self.dest_floors.0.clamp(1, top);
        let hi = self.dest_floors.1.clamp(lo, top);
        (lo, hi)
    }
}

fn curve_or_silent(segments: Vec<RateSegment>) -> RateCurve {
    // The built-in segment tables are valid by inspection; fall back to a
    // silent curve rather than panicking if one is ever edited badly.
    RateCurve::new(segments).unwrap_or_else(|_| RateCurve::silent())
}
