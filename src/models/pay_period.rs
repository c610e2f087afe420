use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::Serialize;
use std::fmt;

/// Supported billing cycles. Both run Friday through Thursday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Biweekly,
    Weekly,
}

impl BillingCycle {
    pub fn from_config(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "biweekly" | "bi-weekly" => Some(Self::Biweekly),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biweekly => "biweekly",
            Self::Weekly => "weekly",
        }
    }

    pub fn length_days(&self) -> i64 {
        match self {
            Self::Biweekly => 14,
            Self::Weekly => 7,
        }
    }
}

/// Cycle plus the Friday every period is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPolicy {
    pub cycle: BillingCycle,
    pub anchor: NaiveDate,
}

impl BillingPolicy {
    /// 1970-01-02 is a Friday; with a 14-day cycle it makes 2024-01-05 a period start.
    pub const DEFAULT_ANCHOR: (i32, u32, u32) = (1970, 1, 2);

    pub fn new(cycle: BillingCycle, anchor: NaiveDate) -> Option<Self> {
        (anchor.weekday() == Weekday::Fri).then_some(Self { cycle, anchor })
    }

    pub fn default_anchor() -> NaiveDate {
        let (y, m, d) = Self::DEFAULT_ANCHOR;
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
    }

    pub fn biweekly() -> Self {
        Self {
            cycle: BillingCycle::Biweekly,
            anchor: Self::default_anchor(),
        }
    }

    pub fn weekly() -> Self {
        Self {
            cycle: BillingCycle::Weekly,
            anchor: Self::default_anchor(),
        }
    }
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self::biweekly()
    }
}

/// A computed pay period: Friday 00:00:00 through Thursday 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PayPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PayPeriod {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// First instant after this period.
    pub fn next_start(&self) -> NaiveDateTime {
        self.end + TimeDelta::seconds(1)
    }

    /// Half-open on the next period's start, so sub-second instants on the
    /// last Thursday still belong here.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t < self.next_start()
    }

    pub fn length(&self) -> TimeDelta {
        self.next_start() - self.start
    }

    pub fn next(&self) -> PayPeriod {
        let len = self.length();
        PayPeriod {
            start: self.start + len,
            end: self.end + len,
        }
    }

    pub fn previous(&self) -> PayPeriod {
        let len = self.length();
        PayPeriod {
            start: self.start - len,
            end: self.end - len,
        }
    }

    /// `Pay Period 01/05 - 01/18`
    pub fn label(&self) -> String {
        format!(
            "Pay Period {} - {}",
            self.start.format("%m/%d"),
            self.end.format("%m/%d")
        )
    }

    /// `20240105_20240118`, used to name export files.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start_date().format("%Y-%m-%d"),
            self.end_date().format("%Y-%m-%d")
        )
    }
}
