//! Snapshot of everything the dashboard shows, computed once per tick.

use crate::core::earnings::{EarningsAggregator, PeriodTotals};
use crate::core::period::PayPeriodCalculator;
use crate::core::store::SessionStore;
use crate::core::tracker::SessionTracker;
use crate::errors::AppResult;
use crate::models::{BillingPolicy, PayPeriod};
use crate::utils::formatting::{hour_bar, money};
use chrono::NaiveDateTime;

pub const HOUR_BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveView {
    pub start_time: NaiveDateTime,
    pub elapsed_secs: i64,
    pub session_earnings: f64,
    pub hour_progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub now: NaiveDateTime,
    pub hourly_rate: f64,
    pub active: Option<ActiveView>,
    pub period: PayPeriod,
    pub period_totals: PeriodTotals,
}

impl DashboardView {
    /// Read-only snapshot of `tracker` at `now`.
    pub fn capture<S: SessionStore>(
        tracker: &SessionTracker<S>,
        policy: &BillingPolicy,
        now: NaiveDateTime,
    ) -> AppResult<Self> {
        let period = PayPeriodCalculator::period_for(now, policy);
        let period_totals = EarningsAggregator::period_earnings(tracker, &period, now)?;

        let active = tracker.active_session().map(|s| ActiveView {
            start_time: s.start_time,
            elapsed_secs: tracker.elapsed_at(now).num_seconds(),
            session_earnings: tracker.earnings_at(now),
            hour_progress: tracker.hour_progress_at(now),
        });

        // the running session keeps the rate it was opened with
        let hourly_rate = tracker
            .active_session()
            .map(|s| s.hourly_rate)
            .unwrap_or_else(|| tracker.hourly_rate());

        Ok(Self {
            now,
            hourly_rate,
            active,
            period,
            period_totals,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Body text, without the title.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        match &self.active {
            Some(a) => {
                lines.push("Current Hour Progress:".to_string());
                lines.push(hour_bar(a.elapsed_secs, HOUR_BAR_WIDTH));
                lines.push(String::new());
                lines.push(format!("Clocked In: {}", a.start_time.format("%I:%M %p")));
                lines.push(format!("Hourly Rate: {}", money(self.hourly_rate)));
                lines.push(String::new());
                lines.push(format!("Session Earnings: {}", money(a.session_earnings)));
            }
            None => {
                lines.push("Status: Not clocked in".to_string());
                lines.push(format!("Hourly Rate: {}", money(self.hourly_rate)));
                lines.push(String::new());
                lines.push(format!("Session Earnings: {}", money(0.0)));
            }
        }

        lines.push(format!(
            "Pay Period Earnings: {}",
            money(self.period_totals.total_earnings)
        ));
        lines.push(self.period.label());
        lines.push(String::new());
        lines.push(format!("Current Time: {}", self.now.format("%I:%M:%S %p")));

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn idle_view_shows_zero_session_and_period_history() {
        let mut t = SessionTracker::new(DbPool::in_memory().unwrap(), 45.0).unwrap();
        t.clock_in_at(dt(5, 9, 0)).unwrap();
        t.clock_out_at(dt(5, 11, 30), None).unwrap();

        let view = DashboardView::capture(&t, &BillingPolicy::biweekly(), dt(8, 14, 5)).unwrap();
        assert!(!view.is_active());
        assert_eq!(
            view.lines(),
            vec![
                "Status: Not clocked in",
                "Hourly Rate: $45.00",
                "",
                "Session Earnings: $0.00",
                "Pay Period Earnings: $112.50",
                "Pay Period 01/05 - 01/18",
                "",
                "Current Time: 02:05:00 PM",
            ]
        );
    }

    #[test]
    fn active_view_includes_live_session() {
        let mut t = SessionTracker::new(DbPool::in_memory().unwrap(), 60.0).unwrap();
        t.clock_in_at(dt(5, 9, 0)).unwrap();
        t.clock_out_at(dt(5, 10, 0), None).unwrap();
        t.clock_in_at(dt(8, 13, 0)).unwrap();

        let view = DashboardView::capture(&t, &BillingPolicy::biweekly(), dt(8, 14, 30)).unwrap();
        let a = view.active.as_ref().unwrap();
        assert_eq!(a.elapsed_secs, 5400);
        assert_eq!(a.session_earnings, 90.0);
        assert_eq!(a.hour_progress, 0.5);
        assert_eq!(view.period_totals.total_earnings, 150.0);

        let lines = view.lines();
        assert_eq!(lines[0], "Current Hour Progress:");
        assert_eq!(lines[1], "[██████████░░░░░░░░░░] 30:00/60:00");
        assert_eq!(lines[3], "Clocked In: 01:00 PM");
        assert!(lines.contains(&"Session Earnings: $90.00".to_string()));
        assert!(lines.contains(&"Pay Period Earnings: $150.00".to_string()));
    }

    #[test]
    fn capture_does_not_change_tracker_state() {
        let mut t = SessionTracker::new(DbPool::in_memory().unwrap(), 60.0).unwrap();
        t.clock_in_at(dt(5, 9, 0)).unwrap();
        let before = t.state().clone();

        for m in 0..3 {
            DashboardView::capture(&t, &BillingPolicy::biweekly(), dt(5, 9, m)).unwrap();
        }
        assert_eq!(t.state(), &before);
        assert!(t.store().closed_session_starts().unwrap().is_empty());
    }
}
