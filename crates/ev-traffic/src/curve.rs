//! Piecewise-constant arrival-rate curves over a 24-hour day.

use ev_core::time::SECS_PER_DAY;

use crate::{TrafficError, TrafficResult};

/// One constant-rate interval, `[start_s, end_s)` seconds after midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSegment {
    pub start_s: f64,
    pub end_s: f64,
    pub rate_per_sec: f64,
}

impl RateSegment {
    pub fn new(start_s: f64, end_s: f64, rate_per_sec: f64) -> Self {
        Self { start_s, end_s, rate_per_sec }
    }
}

/// Ordered, non-overlapping rate segments covering (parts of) one day.
///
/// The rate is zero anywhere no segment applies.  `max_rate` is cached at
/// construction; the thinning sampler uses it as its majorizing constant.
#[derive(Debug, Clone)]
pub struct RateCurve {
    segments: Vec<RateSegment>,
    max_rate: f64,
}

impl RateCurve {
    /// Validate and build a curve.  Segments must be within the day, in
    /// ascending order, non-overlapping, with non-negative rates.
    pub fn new(segments: Vec<RateSegment>) -> TrafficResult<Self> {
        if segments.is_empty() {
            return Err(TrafficError::EmptyCurve);
        }
        for seg in &segments {
            if !(seg.start_s >= 0.0 && seg.end_s <= SECS_PER_DAY && seg.start_s < seg.end_s) {
                return Err(TrafficError::InvalidSegment(format!(
                    "bounds [{}, {}) outside [0, 86400) or inverted",
                    seg.start_s, seg.end_s
                )));
            }
            if !(seg.rate_per_sec >= 0.0) {
                return Err(TrafficError::InvalidSegment(format!(
                    "negative rate {}",
                    seg.rate_per_sec
                )));
            }
        }
        for pair in segments.windows(2) {
            if pair[1].start_s < pair[0].end_s {
                return Err(TrafficError::InvalidSegment(format!(
                    "segment starting at {} overlaps previous ending at {}",
                    pair[1].start_s, pair[0].end_s
                )));
            }
        }
        let max_rate = segments
            .iter()
            .map(|s| s.rate_per_sec)
            .fold(0.0, f64::max);
        Ok(Self { segments, max_rate })
    }

    /// A single all-day segment at `rate_per_sec`.
    pub fn constant(rate_per_sec: f64) -> TrafficResult<Self> {
        Self::new(vec![RateSegment::new(0.0, SECS_PER_DAY, rate_per_sec)])
    }

    /// A curve that never produces arrivals.
    pub fn silent() -> Self {
        Self {
            segments: vec![RateSegment::new(0.0, SECS_PER_DAY, 0.0)],
            max_rate: 0.0,
        }
    }

    /// Arrival rate at `day_secs` seconds after midnight; 0 outside all
    /// segments.
    pub fn rate_at(&self, day_secs: f64) -> f64 {
        self.segments
            .iter()
            .find(|s| day_secs >= s.start_s && day_secs < s.end_s)
            .map(|s| s.rate_per_sec)
            .unwrap_or(0.0)
    }

    /// The largest segment rate.
    #[inline]
    pub fn max_rate(&self) -> f64 {
        self.max_rate
    }

    pub fn segments(&self) -> &[RateSegment] {
        &self.segments
    }
}
