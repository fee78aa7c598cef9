//! The metrics aggregator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ev_core::{CallId, PersonType};
use ev_events::{EventBus, EventKind, Subscription};

/// Default wait-time service target.
pub const DEFAULT_WAIT_TARGET_SECS: f64 = 60.0;

#[derive(Default)]
struct MetricsInner {
    /// Call id → (request time, person type), from `CallRequested`.
    requests: HashMap<CallId, (f64, PersonType)>,
    /// Call id → board time, from `PersonBoarded`.
    board_times: HashMap<CallId, f64>,
    waits: Vec<f64>,
    rides: Vec<f64>,
    waits_by_type: HashMap<PersonType, Vec<f64>>,
}

/// Bus-fed wait/ride statistics.
///
/// Shared behind an `Arc` so the bus handler (created by
/// [`attach`](MetricsAggregator::attach)) and the driver can both reach it.
pub struct MetricsAggregator {
    inner: Mutex<MetricsInner>,
    wait_target_secs: f64,
}

impl MetricsAggregator {
    pub fn new() -> Arc<Self> {
        Self::with_target(DEFAULT_WAIT_TARGET_SECS)
    }

    pub fn with_target(wait_target_secs: f64) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(MetricsInner::default()),
            wait_target_secs,
        })
    }

    /// Subscribe to the events the aggregator consumes.
    pub fn attach(self: &Arc<Self>, bus: &Arc<EventBus>) -> Subscription {
        let metrics = Arc::clone(self);
        bus.subscribe(move |event| match event.kind {
            EventKind::CallRequested { call_id, person_type, .. } => {
                metrics.on_requested(call_id, person_type, event.t);
            }
            EventKind::PersonBoarded { call_id, .. } => {
                metrics.on_boarded(call_id, event.t);
            }
            EventKind::PersonAlighted { call_id, .. } => {
                metrics.on_alighted(call_id, event.t);
            }
            _ => {}
        })
    }

    fn on_requested(&self, call_id: CallId, person_type: PersonType, t: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.insert(call_id, (t, person_type));
    }

    fn on_boarded(&self, call_id: CallId, t: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.board_times.insert(call_id, t);
        if let Some(&(requested_at, person_type)) = inner.requests.get(&call_id) {
            let wait = t - requested_at;
            if wait >= 0.0 {
                inner.waits.push(wait);
                inner.waits_by_type.entry(person_type).or_default().push(wait);
            }
        }
    }

    fn on_alighted(&self, call_id: CallId, t: f64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(&board_t) = inner.board_times.get(&call_id) {
            inner.rides.push(t - board_t);
        }
    }

    /// Build a point-in-time report.
    pub fn report(&self) -> MetricsReport {
        let inner = self.inner.lock().unwrap();

        // `ALL` order keeps the breakdown stable across runs.
        let by_type: Vec<(PersonType, WaitStats)> = PersonType::ALL
            .iter()
            .filter_map(|&kind| {
                inner
                    .waits_by_type
                    .get(&kind)
                    .filter(|w| !w.is_empty())
                    .map(|w| (kind, WaitStats::from_samples(w, self.wait_target_secs)))
            })
            .collect();

        MetricsReport {
            wait: WaitStats::from_samples(&inner.waits, self.wait_target_secs),
            ride: StatSummary::from_samples(&inner.rides),
            wait_by_type: by_type,
            wait_target_secs: self.wait_target_secs,
        }
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// Count, mean, and nearest-rank 95th percentile of a sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSummary {
    pub count: usize,
    pub mean_secs: f64,
    pub p95_secs: f64,
}

impl StatSummary {
    /// Summarize `samples`.  Empty input yields all-zero stats.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self { count: 0, mean_secs: 0.0, p95_secs: 0.0 };
        }
        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;

        // Nearest-rank percentile on a sorted copy:
        // rank = clamp(ceil(0.95 * n), 1, n), value = sorted[rank - 1].
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let rank = ((0.95 * count as f64).ceil() as usize).clamp(1, count);
        let p95 = sorted[rank - 1];

        Self { count, mean_secs: mean, p95_secs: p95 }
    }
}

/// Wait statistics: a summary plus the share of samples within the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitStats {
    pub summary: StatSummary,
    /// Percentage (0–100) of waits at or under the target.
    pub pct_within_target: f64,
}

impl WaitStats {
    pub fn from_samples(samples: &[f64], target_secs: f64) -> Self {
        let summary = StatSummary::from_samples(samples);
        let pct = if samples.is_empty() {
            0.0
        } else {
            let within = samples.iter().filter(|&&w| w <= target_secs).count();
            100.0 * within as f64 / samples.len() as f64
        };
        Self { summary, pct_within_target: pct }
    }
}

/// Full aggregator output.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub wait: WaitStats,
    pub ride: StatSummary,
    /// Per-type wait breakdown, in `PersonType::ALL` order; types with no
    /// samples are omitted.
    pub wait_by_type: Vec<(PersonType, WaitStats)>,
    pub wait_target_secs: f64,
}
