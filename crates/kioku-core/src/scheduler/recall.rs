//! Half-life recall model
//!
//! Memory decays exponentially: after one half-life the probability of
//! recalling an item has dropped to 50%.
//!
//! - Recall: P = 2^(-t / h)
//! - Inverse: t = -h * log2(P)

use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Estimated probability of recalling an item `elapsed_hours` after its last review.
///
/// Unseen items (`half_life_hours <= 0`) return 0 so they sort as maximally due.
/// Negative elapsed time is treated as 0.
pub fn recall_probability(half_life_hours: f64, elapsed_hours: f64) -> f64 {
    if half_life_hours.is_nan() || half_life_hours <= 0.0 {
        return 0.0;
    }
    let elapsed = elapsed_hours.max(0.0);
    2f64.powf(-elapsed / half_life_hours).clamp(0.0, 1.0)
}

/// Hours until recall probability decays to `target_probability`.
///
/// `target_probability` must lie in (0, 1); values outside that range and
/// non-positive half-lives yield 0 (due immediately).
pub fn hours_until_probability(half_life_hours: f64, target_probability: f64) -> f64 {
    if half_life_hours.is_nan() || half_life_hours <= 0.0 {
        return 0.0;
    }
    if !(target_probability > 0.0 && target_probability < 1.0) {
        return 0.0;
    }
    -half_life_hours * target_probability.log2()
}

/// Fractional hours from `from` to `to`, clamped at 0
pub fn elapsed_hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_HOUR
}

/// Convert fractional hours to a chrono duration (millisecond precision)
pub fn hours_to_duration(hours: f64) -> Duration {
    if !hours.is_finite() || hours <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}
