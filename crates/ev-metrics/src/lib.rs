//! `ev-metrics` — wait and ride time statistics.
//!
//! The aggregator subscribes to `CallRequested`, `PersonBoarded`, and
//! `PersonAlighted` and correlates them by call id:
//!
//! ```text
//! wait = board_t  - request_t      (per call, overall and per person type)
//! ride = alight_t - board_t        (per call)
//! ```
//!
//! Reports give count, mean, nearest-rank 95th percentile, and the share of
//! waits within a configured target (default 60 s).

pub mod aggregator;

#[cfg(test)]
mod tests;

pub use aggregator::{
    MetricsAggregator, MetricsReport, StatSummary, WaitStats, DEFAULT_WAIT_TARGET_SECS,
};
