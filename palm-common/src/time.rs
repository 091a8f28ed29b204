//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Scale a millisecond delay by a non-negative factor
///
/// Rounded to whole nanoseconds; negative or non-finite factors collapse to
/// zero.
pub fn scaled_duration(millis: u64, factor: f64) -> std::time::Duration {
    if !factor.is_finite() || factor <= 0.0 {
        return std::time::Duration::ZERO;
    }
    let nanos = (millis as f64 * factor * 1_000_000.0).round();
    std::time::Duration::from_nanos(nanos as u64)
}
