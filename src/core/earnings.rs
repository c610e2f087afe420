//! Per-period totals of worked time and earnings.

use crate::core::store::SessionStore;
use crate::core::tracker::SessionTracker;
use crate::errors::AppResult;
use crate::models::{PayPeriod, Session};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub total_seconds: i64,
    pub total_earnings: f64,
    pub closed_sessions: usize,
    /// The running session contributed to the totals.
    pub includes_live: bool,
}

impl PeriodTotals {
    pub fn total_hours(&self) -> f64 {
        crate::utils::time::seconds_to_hours(self.total_seconds)
    }
}

pub struct EarningsAggregator;

impl EarningsAggregator {
    /// Totals of already closed sessions, using the earnings stored at close.
    pub fn summarize(sessions: &[Session]) -> PeriodTotals {
        sessions
            .iter()
            .filter_map(|s| s.end_time.map(|end| (s, end)))
            .fold(PeriodTotals::default(), |mut acc, (s, end)| {
                acc.total_seconds += s.duration_seconds_at(end);
                acc.total_earnings += s.earnings_at(end);
                acc.closed_sessions += 1;
                acc
            })
    }

    /// Closed sessions started inside `period`.
    pub fn historical<S: SessionStore>(store: &S, period: &PayPeriod) -> AppResult<PeriodTotals> {
        let sessions = store.closed_sessions_between(period.start, period.end)?;
        Ok(Self::summarize(&sessions))
    }

    /// Historical totals plus the running session when it started inside
    /// `period`. A session counts wholly toward the period of its start.
    pub fn period_earnings<S: SessionStore>(
        tracker: &SessionTracker<S>,
        period: &PayPeriod,
        now: NaiveDateTime,
    ) -> AppResult<PeriodTotals> {
        let mut totals = Self::historical(tracker.store(), period)?;

        if let Some(live) = tracker.active_session()
            && period.contains(live.start_time)
        {
            totals.total_seconds += live.duration_seconds_at(now);
            totals.total_earnings += live.earnings_at(now);
            totals.includes_live = true;
        }

        Ok(totals)
    }
}
