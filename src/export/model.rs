// src/export/model.rs

use crate::core::earnings::PeriodTotals;
use crate::models::{PayPeriod, Session};
use crate::utils::time::{format_timestamp, seconds_to_hours};
use serde::Serialize;

/// Flat per-session row used by both CSV and JSON exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ExportRow {
    pub start_time: String,
    pub end_time: String,
    pub duration_seconds: i64,
    pub earnings: f64,
    pub memo: String,
}

impl ExportRow {
    /// `None` for a session that is still open.
    pub fn from_session(s: &Session) -> Option<Self> {
        let end = s.end_time?;
        Some(Self {
            start_time: format_timestamp(&s.start_time),
            end_time: format_timestamp(&end),
            duration_seconds: s.duration_seconds_at(end),
            earnings: s.earnings_at(end),
            memo: s.memo.clone(),
        })
    }

    pub fn duration_hours(&self) -> f64 {
        seconds_to_hours(self.duration_seconds)
    }
}

/// The closed sessions of one pay period, ordered by start time.
#[derive(Serialize, Clone, Debug)]
pub struct ExportReport {
    pub period: PayPeriod,
    pub rows: Vec<ExportRow>,
    pub totals: PeriodTotals,
}

impl ExportReport {
    pub fn file_name(&self, ext: &str) -> String {
        format!("timeclock_export_{}.{}", self.period.file_stem(), ext)
    }
}
