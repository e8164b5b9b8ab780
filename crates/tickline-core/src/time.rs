//! Time unit helpers
//!
//! Clocks run in nanoseconds (`i64`). Intervals exposed to consumers are in
//! microseconds (`f64`), the canonical unit of every timeline range.

use std::time::Duration;

/// Nanoseconds per microsecond
pub const NANOS_PER_MICRO: i64 = 1_000;

/// Nanoseconds per second
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Microseconds per second
pub const MICROS_PER_SEC: i64 = 1_000_000;

#[inline]
pub fn ns_to_us(ns: i64) -> f64 {
    ns as f64 / NANOS_PER_MICRO as f64
}

#[inline]
pub fn us_to_ns(us: f64) -> i64 {
    (us * NANOS_PER_MICRO as f64) as i64
}

#[inline]
pub fn secs_to_us(secs: f64) -> f64 {
    secs * MICROS_PER_SEC as f64
}

#[inline]
pub fn secs_to_ns(secs: i64) -> i64 {
    secs.saturating_mul(NANOS_PER_SEC)
}

/// Saturating conversion of a std duration to clock nanoseconds
#[inline]
pub fn duration_to_ns(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}
