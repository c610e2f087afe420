//! Pay period boundaries.
//!
//! Periods are aligned to the policy's anchor Friday and tile the calendar:
//! the period index of a date is `floor((date - anchor) / length)`, so two
//! calls never disagree on where a period starts, whatever the month lengths.

use crate::models::{BillingPolicy, PayPeriod};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

pub struct PayPeriodCalculator;

impl PayPeriodCalculator {
    /// The pay period containing `instant`.
    pub fn period_for(instant: NaiveDateTime, policy: &BillingPolicy) -> PayPeriod {
        Self::period_for_date(instant.date(), policy)
    }

    pub fn period_for_date(date: NaiveDate, policy: &BillingPolicy) -> PayPeriod {
        let len = policy.cycle.length_days();
        let offset = (date - policy.anchor).num_days();
        let index = offset.div_euclid(len);

        let start_date = policy.anchor + TimeDelta::days(index * len);
        let start = start_date.and_time(NaiveTime::MIN);
        let end = start + TimeDelta::days(len) - TimeDelta::seconds(1);

        PayPeriod { start, end }
    }

    /// Distinct periods touched by `instants`, newest first.
    pub fn distinct_periods<I>(instants: I, policy: &BillingPolicy) -> Vec<PayPeriod>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut periods: Vec<PayPeriod> = instants
            .into_iter()
            .map(|t| Self::period_for(t, policy))
            .collect();
        periods.sort_by(|a, b| b.start.cmp(&a.start));
        periods.dedup();
        periods
    }
}
