//! Time utilities: wall-clock "now", timestamp (de)serialization, durations.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, SubsecRound, TimeDelta};

/// Storage format for session timestamps (local wall-clock, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Hours represented by a number of seconds.
pub fn seconds_to_hours(secs: i64) -> f64 {
    secs as f64 / 3600.0
}

/// Never negative: a clock that moved backwards counts as zero elapsed time.
pub fn non_negative(delta: TimeDelta) -> TimeDelta {
    if delta < TimeDelta::zero() {
        TimeDelta::zero()
    } else {
        delta
    }
}
