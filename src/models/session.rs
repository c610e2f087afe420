use crate::utils::time::{non_negative, seconds_to_hours};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

/// One clock-in/clock-out interval of worked time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: i64,                        // ⇔ sessions.id
    pub start_time: NaiveDateTime,      // ⇔ sessions.start_time (TEXT "YYYY-MM-DD HH:MM:SS")
    pub end_time: Option<NaiveDateTime>, // NULL while the session is active
    pub hourly_rate: f64,               // rate captured at clock-in
    pub earnings: Option<f64>,          // captured at clock-out
    pub memo: String,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time at `now` for an active session, final duration otherwise.
    pub fn duration_at(&self, now: NaiveDateTime) -> TimeDelta {
        let end = self.end_time.unwrap_or(now);
        non_negative(end - self.start_time)
    }

    pub fn duration_seconds_at(&self, now: NaiveDateTime) -> i64 {
        self.duration_at(now).num_seconds()
    }

    /// Earnings at `now`: the stored value for closed sessions, the live
    /// rate-scaled value for the active one.
    pub fn earnings_at(&self, now: NaiveDateTime) -> f64 {
        match self.earnings {
            Some(e) if !self.is_active() => e,
            _ => earnings_for(self.duration_seconds_at(now), self.hourly_rate),
        }
    }
}

/// `hours * rate` for a duration expressed in whole seconds.
pub fn earnings_for(secs: i64, hourly_rate: f64) -> f64 {
    seconds_to_hours(secs) * hourly_rate
}
