//! Non-homogeneous Poisson next-arrival sampling via thinning.

use ev_core::time::SECS_PER_DAY;
use ev_core::SimRng;

use crate::RateCurve;

/// Sample the next arrival after simulation time `t0` (elapsed seconds).
///
/// Candidate arrivals are drawn from a homogeneous Poisson process at the
/// curve's max rate and accepted with probability `rate(t) / max_rate` —
/// the classic thinning construction.  Exactly one `u` and one `d` are
/// drawn per candidate; extra draws happen only when thinning rejects,
/// which is intrinsic to the algorithm.
///
/// Returns `None` (no arrival, "+∞") when the curve is silent or no
/// candidate is accepted before `t0 + horizon`.  `start_of_day_secs` maps
/// elapsed time onto the curve's 24-hour domain.
pub fn next_arrival_thinning(
    curve: &RateCurve,
    start_of_day_secs: f64,
    t0: f64,
    horizon_secs: f64,
    rng: &mut SimRng,
) -> Option<f64> {
    let max_rate = curve.max_rate();
    if max_rate <= 0.0 {
        return None;
    }

    let mut t = t0;
    loop {
        // u, d are in (0, 1]: strictly positive, so ln(u) is finite.
        let u = rng.uniform_open0();
        t += -u.ln() / max_rate;
        if t >= t0 + horizon_secs {
            return None;
        }
        let d = rng.uniform_open0();
        let rate = curve.rate_at((start_of_day_secs + t) % SECS_PER_DAY);
        if d <= rate / max_rate {
            return Some(t);
        }
    }
}
