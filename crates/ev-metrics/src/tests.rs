//! Unit tests for ev-metrics.

use ev_core::{CallId, Direction, PersonId, PersonType, VehicleId};
use ev_events::{DomainEvent, EventBus, EventKind};

use crate::{MetricsAggregator, StatSummary};

fn requested(call: u64, kind: PersonType, t: f64) -> DomainEvent {
    DomainEvent::new(
        t,
        "test",
        EventKind::CallRequested {
            call_id: CallId(call),
            person_id: PersonId(call),
            person_type: kind,
            origin: 0,
            destination: 5,
            direction: Direction::Up,
        },
    )
}

fn boarded(call: u64, t: f64) -> DomainEvent {
    DomainEvent::new(
        t,
        "test",
        EventKind::PersonBoarded {
            person_id: PersonId(call),
            call_id: CallId(call),
            vehicle_id: VehicleId(1),
            floor: 0,
            vehicle_occupant_count_after: 1,
        },
    )
}

fn alighted(call: u64, t: f64) -> DomainEvent {
    DomainEvent::new(
        t,
        "test",
        EventKind::PersonAlighted {
            person_id: PersonId(call),
            call_id: CallId(call),
            vehicle_id: VehicleId(1),
            floor: 5,
            vehicle_occupant_count_after: 0,
        },
    )
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn empty_samples_are_zero() {
        let s = StatSummary::from_samples(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean_secs, 0.0);
        assert_eq!(s.p95_secs, 0.0);
    }

    #[test]
    fn mean_and_p95() {
        // 1..=100: mean 50.5, nearest-rank p95 = sorted[ceil(95) - 1] = 95.
        let samples: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let s = StatSummary::from_samples(&samples);
        assert_eq!(s.count, 100);
        assert!((s.mean_secs - 50.5).abs() < 1e-9);
        assert_eq!(s.p95_secs, 95.0);
    }

    #[test]
    fn p95_small_sample_ranks() {
        // n=1: rank clamps to 1.
        assert_eq!(StatSummary::from_samples(&[7.0]).p95_secs, 7.0);
        // n=3: ceil(2.85) = 3 → the largest.
        assert_eq!(StatSummary::from_samples(&[3.0, 1.0, 2.0]).p95_secs, 3.0);
    }

    #[test]
    fn unsorted_input_handled() {
        let s = StatSummary::from_samples(&[9.0, 1.0, 5.0]);
        assert_eq!(s.p95_secs, 9.0);
        assert!((s.mean_secs - 5.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod aggregator_tests {
    use super::*;

    #[test]
    fn wait_and_ride_correlated_by_call() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::new();
        let _sub = metrics.attach(&bus);

        bus.publish(&requested(1, PersonType::Resident, 0.0));
        bus.publish(&boarded(1, 12.0));
        bus.publish(&alighted(1, 30.0));

        let report = metrics.report();
        assert_eq!(report.wait.summary.count, 1);
        assert!((report.wait.summary.mean_secs - 12.0).abs() < 1e-9);
        assert_eq!(report.ride.count, 1);
        assert!((report.ride.mean_secs - 18.0).abs() < 1e-9);
    }

    #[test]
    fn per_type_breakdown() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::new();
        let _sub = metrics.attach(&bus);

        bus.publish(&requested(1, PersonType::Resident, 0.0));
        bus.publish(&boarded(1, 10.0));
        bus.publish(&requested(2, PersonType::Shopper, 0.0));
        bus.publish(&boarded(2, 30.0));

        let report = metrics.report();
        assert_eq!(report.wait.summary.count, 2);
        assert_eq!(report.wait_by_type.len(), 2);
        let (kind, stats) = &report.wait_by_type[0];
        assert_eq!(*kind, PersonType::Resident);
        assert!((stats.summary.mean_secs - 10.0).abs() < 1e-9);
        let (kind, stats) = &report.wait_by_type[1];
        assert_eq!(*kind, PersonType::Shopper);
        assert!((stats.summary.mean_secs - 30.0).abs() < 1e-9);
    }

    #[test]
    fn pct_within_target() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::with_target(60.0);
        let _sub = metrics.attach(&bus);

        for (call, wait) in [(1u64, 30.0), (2, 59.0), (3, 61.0), (4, 120.0)] {
            bus.publish(&requested(call, PersonType::OfficeWorker, 0.0));
            bus.publish(&boarded(call, wait));
        }

        let report = metrics.report();
        assert!((report.wait.pct_within_target - 50.0).abs() < 1e-9);
    }

    #[test]
    fn board_without_request_gives_no_wait_sample() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::new();
        let _sub = metrics.attach(&bus);

        bus.publish(&boarded(1, 5.0));
        bus.publish(&alighted(1, 9.0));

        let report = metrics.report();
        assert_eq!(report.wait.summary.count, 0, "unknown call: no wait sample");
        assert_eq!(report.ride.count, 1, "ride still measured from board time");
    }

    #[test]
    fn negative_wait_skipped() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::new();
        let _sub = metrics.attach(&bus);

        // Board event stamped before the request (clock confusion upstream).
        bus.publish(&requested(1, PersonType::Resident, 10.0));
        bus.publish(&boarded(1, 5.0));

        assert_eq!(metrics.report().wait.summary.count, 0);
    }

    #[test]
    fn alight_without_board_ignored() {
        let bus = EventBus::new();
        let metrics = MetricsAggregator::new();
        let _sub = metrics.attach(&bus);

        bus.publish(&alighted(1, 9.0));
        assert_eq!(metrics.report().ride.count, 0);
    }
}
