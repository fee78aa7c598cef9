//! Unit and integration tests for ev-traffic.

use std::sync::{Arc, Mutex};

use ev_building::{Building, Vehicle};
use ev_control::ElevatorController;
use ev_core::{CallId, Direction, PersonId, PersonState, PersonType, SimRng, VehicleId};
use ev_dispatch::NearestIdlePolicy;
use ev_events::{DomainEvent, EventBus, EventKind, Subscription};

use crate::{
    next_arrival_thinning, Destination, PassengerController, PersonDirectory, RateCurve,
    RateSegment, Route, TrafficProfile,
};

#[cfg(test)]
mod curve_tests {
    use super::*;

    #[test]
    fn empty_curve_rejected() {
        assert!(RateCurve::new(vec![]).is_err());
    }

    #[test]
    fn inverted_segment_rejected() {
        let r = RateCurve::new(vec![RateSegment::new(100.0, 50.0, 0.1)]);
        assert!(r.is_err());
    }

    #[test]
    fn negative_rate_rejected() {
        let r = RateCurve::new(vec![RateSegment::new(0.0, 100.0, -0.1)]);
        assert!(r.is_err());
    }

    #[test]
    fn overlapping_segments_rejected() {
        let r = RateCurve::new(vec![
            RateSegment::new(0.0, 100.0, 0.1),
            RateSegment::new(50.0, 200.0, 0.2),
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn rate_lookup_half_open() {
        let c = RateCurve::new(vec![
            RateSegment::new(100.0, 200.0, 0.5),
            RateSegment::new(200.0, 300.0, 0.25),
        ])
        .unwrap();
        assert_eq!(c.rate_at(50.0), 0.0);
        assert_eq!(c.rate_at(100.0), 0.5);
        assert_eq!(c.rate_at(199.9), 0.5);
        assert_eq!(c.rate_at(200.0), 0.25);
        assert_eq!(c.rate_at(300.0), 0.0);
        assert_eq!(c.max_rate(), 0.5);
    }

    #[test]
    fn silent_curve_has_zero_max() {
        assert_eq!(RateCurve::silent().max_rate(), 0.0);
    }

    #[test]
    fn default_profiles_are_valid() {
        for (kind, profile) in TrafficProfile::defaults() {
            assert!(
                profile.curve.max_rate() > 0.0,
                "{kind} default curve should produce arrivals"
            );
            assert!(profile.stay_secs.0 <= profile.stay_secs.1);
        }
    }

    #[test]
    fn dest_bounds_clamp_to_building() {
        let profile = TrafficProfile::default_for(PersonType::OfficeWorker);
        // 40-floor building: full range available.
        let (lo, hi) = profile.dest_bounds(40);
        assert_eq!((lo, hi), (2, 39));
        // 3-floor building: clamped.
        let (lo, hi) = profile.dest_bounds(3);
        assert_eq!((lo, hi), (2, 2));
        // Degenerate 1-floor building still yields a non-empty range.
        let (lo, hi) = profile.dest_bounds(1);
        assert!(lo <= hi);
    }
}

#[cfg(test)]
mod thinning_tests {
    use super::*;

    #[test]
    fn silent_curve_yields_none() {
        let mut rng = SimRng::new(1);
        let c = RateCurve::silent();
        assert_eq!(next_arrival_thinning(&c, 0.0, 0.0, 86_400.0, &mut rng), None);
    }

    #[test]
    fn samples_are_strictly_after_t0() {
        let mut rng = SimRng::new(7);
        let c = RateCurve::constant(0.1).unwrap();
        for i in 0..200 {
            let t0 = i as f64 * 5.0;
            let t = next_arrival_thinning(&c, 0.0, t0, 86_400.0, &mut rng)
                .expect("constant curve always yields an arrival");
            assert!(t > t0);
        }
    }

    #[test]
    fn horizon_bounds_search() {
        // Rate only after 10:00; sampling at midnight with a 1 h horizon
        // cannot reach it.
        let c = RateCurve::new(vec![RateSegment::new(36_000.0, 72_000.0, 0.5)]).unwrap();
        let mut rng = SimRng::new(3);
        assert_eq!(next_arrival_thinning(&c, 0.0, 0.0, 3_600.0, &mut rng), None);
    }

    #[test]
    fn deterministic_for_seed() {
        let c = RateCurve::constant(0.05).unwrap();
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        for _ in 0..50 {
            assert_eq!(
                next_arrival_thinning(&c, 0.0, 0.0, 86_400.0, &mut a),
                next_arrival_thinning(&c, 0.0, 0.0, 86_400.0, &mut b),
            );
        }
    }

    #[test]
    fn mean_gap_tracks_rate() {
        // For a homogeneous process the mean inter-arrival gap is 1/rate.
        let rate = 0.2;
        let c = RateCurve::constant(rate).unwrap();
        let mut rng = SimRng::new(1234);
        let mut t = 0.0;
        let n = 2_000;
        for _ in 0..n {
            t = next_arrival_thinning(&c, 0.0, t, 1e9, &mut rng).unwrap();
        }
        let mean_gap = t / n as f64;
        assert!(
            (mean_gap - 1.0 / rate).abs() < 0.5,
            "mean gap {mean_gap} should be near {}",
            1.0 / rate
        );
    }

    #[test]
    fn start_of_day_shifts_curve() {
        // Curve active 08:00–09:00 only.  Starting the sim at 08:00 means
        // arrivals come almost immediately.
        let c = RateCurve::new(vec![RateSegment::new(28_800.0, 32_400.0, 1.0)]).unwrap();
        let mut rng = SimRng::new(5);
        let t = next_arrival_thinning(&c, 28_800.0, 0.0, 86_400.0, &mut rng).unwrap();
        assert!(t < 60.0, "arrival at {t} should be near the window start");
    }
}

#[cfg(test)]
mod route_tests {
    use super::*;

    #[test]
    fn empty_route_rejected() {
        assert!(Route::new(vec![]).is_err());
    }

    #[test]
    fn negative_stay_rejected() {
        assert!(Destination::new(3, -1.0).is_err());
    }

    #[test]
    fn round_trip_shape() {
        let r = Route::round_trip(7, 120.0).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.get(0).unwrap().floor, 7);
        assert_eq!(r.get(1).unwrap().floor, 0);
        assert_eq!(r.get(1).unwrap().stay_secs, 0.0);
    }
}

#[cfg(test)]
mod directory_tests {
    use super::*;
    use crate::Person;

    fn boarded(person: u64, t: f64) -> DomainEvent {
        DomainEvent::new(
            t,
            "test",
            EventKind::PersonBoarded {
                person_id: PersonId(person),
                call_id: CallId(1),
                vehicle_id: VehicleId(1),
                floor: 0,
                vehicle_occupant_count_after: 1,
            },
        )
    }

    fn alighted(person: u64, floor: u32, t: f64) -> DomainEvent {
        DomainEvent::new(
            t,
            "test",
            EventKind::PersonAlighted {
                person_id: PersonId(person),
                call_id: CallId(1),
                vehicle_id: VehicleId(1),
                floor,
                vehicle_occupant_count_after: 0,
            },
        )
    }

    #[test]
    fn lifecycle_follows_round_trip() {
        let bus = EventBus::new();
        let dir = PersonDirectory::new();
        let _sub = dir.attach(&bus);

        let route = Route::round_trip(5, 60.0).unwrap();
        dir.insert(Person::spawn(PersonId(1), PersonType::Shopper, route));
        assert_eq!(dir.get(PersonId(1)).unwrap().state, PersonState::Waiting);

        bus.publish(&boarded(1, 10.0));
        assert_eq!(dir.get(PersonId(1)).unwrap().state, PersonState::Riding);

        bus.publish(&alighted(1, 5, 20.0));
        let p = dir.get(PersonId(1)).unwrap();
        assert_eq!(p.state, PersonState::Staying);
        assert_eq!(p.current_floor, 5);

        assert!(dir.mark_waiting(PersonId(1), 80.0, &bus));
        assert_eq!(dir.get(PersonId(1)).unwrap().state, PersonState::Waiting);

        bus.publish(&boarded(1, 90.0));
        bus.publish(&alighted(1, 0, 100.0));
        assert_eq!(dir.get(PersonId(1)).unwrap().state, PersonState::Completed);
    }

    #[test]
    fn state_changes_republished() {
        let bus = EventBus::new();
        let dir = PersonDirectory::new();
        let _sub = dir.attach(&bus);

        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let _watch = bus.subscribe(move |e| {
            if let EventKind::PersonStateChanged { from, to, .. } = e.kind {
                sink.lock().unwrap().push((from, to));
            }
        });

        dir.insert(Person::spawn(
            PersonId(1),
            PersonType::Resident,
            Route::round_trip(3, 10.0).unwrap(),
        ));
        bus.publish(&boarded(1, 1.0));
        bus.publish(&alighted(1, 3, 5.0));

        let changes = changes.lock().unwrap();
        assert_eq!(
            *changes,
            [
                (PersonState::Waiting, PersonState::Riding),
                (PersonState::Riding, PersonState::Staying),
            ]
        );
    }

    #[test]
    fn backward_transition_dropped() {
        let bus = EventBus::new();
        let dir = PersonDirectory::new();
        let _sub = dir.attach(&bus);

        dir.insert(Person::spawn(
            PersonId(1),
            PersonType::Resident,
            Route::round_trip(3, 10.0).unwrap(),
        ));
        // Alight without ever boarding: person is Waiting, not Riding.
        bus.publish(&alighted(1, 3, 5.0));
        assert_eq!(dir.get(PersonId(1)).unwrap().state, PersonState::Waiting);

        // Return fired while not staying: refused.
        assert!(!dir.mark_waiting(PersonId(1), 6.0, &bus));
    }

    #[test]
    fn counts_by_state() {
        let dir = PersonDirectory::new();
        for i in 1..=3 {
            dir.insert(Person::spawn(
                PersonId(i),
                PersonType::Shopper,
                Route::round_trip(2, 5.0).unwrap(),
            ));
        }
        assert_eq!(dir.spawned_total(), 3);
        assert_eq!(dir.count_in(PersonState::Waiting), 3);
        assert_eq!(dir.count_in(PersonState::Riding), 0);
    }
}

#[cfg(test)]
mod controller_tests {
    use super::*;

    /// A traffic mix with one busy constant-rate type and the others silent.
    fn test_profiles(rate: f64, stay: f64) -> Vec<(PersonType, TrafficProfile)> {
        PersonType::ALL
            .iter()
            .map(|&kind| {
                let profile = if kind == PersonType::OfficeWorker {
                    TrafficProfile {
                        curve: RateCurve::constant(rate).unwrap(),
                        dest_floors: (2, 6),
                        stay_secs: (stay, stay),
                    }
                } else {
                    TrafficProfile {
                        curve: RateCurve::silent(),
                        dest_floors: (1, 1),
                        stay_secs: (1.0, 1.0),
                    }
                };
                (kind, profile)
            })
            .collect()
    }

    struct Rig {
        building: Building,
        elevators: ElevatorController,
        traffic: PassengerController,
        events: Arc<Mutex<Vec<DomainEvent>>>,
        _subs: Vec<Subscription>,
    }

    fn rig(seed: u64, rate: f64, stay: f64) -> Rig {
        let bus = EventBus::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let record_sub = bus.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let dir = PersonDirectory::new();
        let dir_sub = dir.attach(&bus);

        let fleet = vec![Vehicle::new(VehicleId(1), 8).unwrap()];
        let elevators =
            ElevatorController::new(fleet, Box::new(NearestIdlePolicy), Arc::clone(&bus));
        let traffic = PassengerController::new(
            seed,
            test_profiles(rate, stay),
            8.0 * 3_600.0,
            dir,
            bus,
        );
        Rig {
            building: Building::new(8).unwrap(),
            elevators,
            traffic,
            events,
            _subs: vec![record_sub, dir_sub],
        }
    }

    #[test]
    fn silent_curves_spawn_nothing() {
        let mut r = rig(42, 0.0, 10.0);
        let mut now = 0.0;
        for _ in 0..100 {
            r.traffic.tick(&mut r.building, &mut r.elevators, now).unwrap();
            now += 0.2;
        }
        assert_eq!(r.elevators.pending_len(), 0);
        assert!(r.events.lock().unwrap().is_empty());
    }

    #[test]
    fn spawns_submit_calls_and_enqueue_lobby() {
        let mut r = rig(42, 0.5, 1_000.0);
        let mut now = 0.0;
        // Traffic only; the elevator controller is never ticked, so calls
        // accumulate in pending and people stay queued at the lobby.
        for _ in 0..100 {
            r.traffic.tick(&mut r.building, &mut r.elevators, now).unwrap();
            now += 0.2;
        }
        let spawned: Vec<PersonId> = r
            .events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::PersonSpawned { person_id, .. } => Some(person_id),
                _ => None,
            })
            .collect();
        assert!(!spawned.is_empty(), "0.5/s for 20 s should spawn");
        assert_eq!(r.elevators.pending_len(), spawned.len());
        assert_eq!(
            r.building.get_floor(0).unwrap().waiting_up(),
            spawned.len()
        );
        // Person ids are dense from 1.
        assert_eq!(spawned[0], PersonId(1));
        assert!(spawned.windows(2).all(|w| w[1].0 == w[0].0 + 1));
        // Every spawn schedules its return.
        assert_eq!(r.traffic.scheduled_len(), spawned.len());
    }

    #[test]
    fn same_seed_reproduces_spawn_sequence() {
        let run = |seed: u64| -> Vec<(PersonId, u32)> {
            let mut r = rig(seed, 0.3, 500.0);
            let mut now = 0.0;
            for _ in 0..200 {
                r.traffic.tick(&mut r.building, &mut r.elevators, now).unwrap();
                now += 0.2;
            }
            let result = r
                .events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e.kind {
                    EventKind::PersonSpawned { person_id, destination, .. } => {
                        Some((person_id, destination))
                    }
                    _ => None,
                })
                .collect();
            result
        };
        let a = run(12_345);
        let b = run(12_345);
        let c = run(54_321);
        assert_eq!(a, b, "identical seeds, identical spawns");
        assert!(!a.is_empty());
        assert_ne!(a, c, "different seed should diverge");
    }

    #[test]
    fn return_call_fires_after_stay() {
        // Short stay: returns fire while the run is still short.  The person
        // never rides (elevators not ticked), so the directory refuses the
        // state flip, but the call is still submitted — downstream defensive
        // paths absorb the drift.
        let mut r = rig(7, 0.5, 4.0);
        let mut now = 0.0;
        for _ in 0..100 {
            r.traffic.tick(&mut r.building, &mut r.elevators, now).unwrap();
            now += 0.2;
        }
        let down_requests = r
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    EventKind::CallRequested { direction: Direction::Down, .. }
                )
            })
            .count();
        assert!(down_requests > 0, "returns should have fired");
    }
}
