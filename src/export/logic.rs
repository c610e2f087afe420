// src/export/logic.rs

use crate::core::earnings::{EarningsAggregator, PeriodTotals};
use crate::core::period::PayPeriodCalculator;
use crate::core::store::SessionStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::csv::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::export_json;
use crate::export::model::{ExportReport, ExportRow};
use crate::models::{BillingPolicy, PayPeriod};
use crate::utils::time::format_timestamp;
use std::path::{Path, PathBuf};

/// A pay period holding at least one closed session.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: PayPeriod,
    pub totals: PeriodTotals,
}

/// High level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Every period with closed sessions, newest first.
    pub fn available_periods<S: SessionStore>(
        store: &S,
        policy: &BillingPolicy,
    ) -> AppResult<Vec<PeriodSummary>> {
        let starts = store.closed_session_starts()?;
        let periods = PayPeriodCalculator::distinct_periods(starts, policy);

        periods
            .into_iter()
            .map(|period| {
                Ok(PeriodSummary {
                    period,
                    totals: EarningsAggregator::historical(store, &period)?,
                })
            })
            .collect()
    }

    /// Rows of the closed sessions started in `period`. The active session
    /// is never exported.
    pub fn build_report<S: SessionStore>(store: &S, period: &PayPeriod) -> AppResult<ExportReport> {
        let sessions = store.closed_sessions_between(period.start, period.end)?;

        if sessions.is_empty() {
            return Err(AppError::EmptyPeriod {
                start: format_timestamp(&period.start),
                end: format_timestamp(&period.end),
            });
        }

        let rows: Vec<ExportRow> = sessions.iter().filter_map(ExportRow::from_session).collect();

        Ok(ExportReport {
            period: *period,
            rows,
            totals: EarningsAggregator::summarize(&sessions),
        })
    }

    /// Write `report` into `dir` and return the created file.
    pub fn export<S: SessionStore>(
        store: &S,
        report: &ExportReport,
        format: ExportFormat,
        dir: &Path,
        force: bool,
    ) -> AppResult<PathBuf> {
        if !dir.is_dir() {
            return Err(AppError::Export(format!(
                "output directory does not exist: {}",
                dir.display()
            )));
        }

        let path = dir.join(report.file_name(format.as_str()));
        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => export_csv(report, &path)?,
            ExportFormat::Json => export_json(report, &path)?,
        }

        let message = format!(
            "Exported {} sessions of {} to {}",
            report.rows.len(),
            report.period,
            path.display()
        );
        log::info!("{message}");
        if let Err(e) = store.log_operation("export", format.as_str(), &message) {
            log::warn!("Failed to write internal log: {e}");
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tracker::SessionTracker;
    use crate::db::pool::DbPool;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn tracker_with_history() -> SessionTracker<DbPool> {
        let mut t = SessionTracker::new(DbPool::in_memory().unwrap(), 45.0).unwrap();
        for (from, to) in [
            (dt(1, 9, 13, 0), dt(1, 9, 14, 0)),
            (dt(1, 5, 9, 0), dt(1, 5, 11, 30)),
            (dt(1, 22, 8, 0), dt(1, 22, 9, 0)),
        ] {
            t.clock_in_at(from).unwrap();
            t.clock_out_at(to, Some("work")).unwrap();
        }
        t
    }

    fn period_of(t: NaiveDateTime) -> PayPeriod {
        PayPeriodCalculator::period_for(t, &BillingPolicy::biweekly())
    }

    #[test]
    fn available_periods_newest_first_with_totals() {
        let t = tracker_with_history();
        let list = ExportLogic::available_periods(t.store(), &BillingPolicy::biweekly()).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].period.start_date(), NaiveDate::from_ymd_opt(2024, 1, 19).unwrap());
        assert_eq!(list[0].totals.closed_sessions, 1);
        assert_eq!(list[1].period.start_date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(list[1].totals.total_earnings, 157.5);
    }

    #[test]
    fn report_rows_are_ordered_and_exclude_the_active_session() {
        let mut t = tracker_with_history();
        t.clock_in_at(dt(1, 10, 9, 0)).unwrap();

        let report = ExportLogic::build_report(t.store(), &period_of(dt(1, 5, 9, 0))).unwrap();
        let starts: Vec<&str> = report.rows.iter().map(|r| r.start_time.as_str()).collect();
        assert_eq!(starts, vec!["2024-01-05 09:00:00", "2024-01-09 13:00:00"]);
        assert_eq!(report.totals.closed_sessions, 2);
        assert_eq!(report.totals.total_seconds, 3 * 3600 + 1800);
        assert_eq!(report.rows[0].memo, "work");
    }

    #[test]
    fn empty_period_is_an_error() {
        let t = tracker_with_history();
        let err = ExportLogic::build_report(t.store(), &period_of(dt(3, 1, 9, 0))).unwrap_err();
        assert!(matches!(err, AppError::EmptyPeriod { .. }));
    }

    #[test]
    fn export_writes_named_file_and_logs() {
        let t = tracker_with_history();
        let dir = tempfile::tempdir().unwrap();
        let report = ExportLogic::build_report(t.store(), &period_of(dt(1, 5, 9, 0))).unwrap();

        let path = ExportLogic::export(t.store(), &report, ExportFormat::Csv, dir.path(), false)
            .unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "timeclock_export_20240105_20240118.csv"
        );

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("start_time,end_time,duration_hours,earnings\n"));
        assert!(body.ends_with("TOTAL,,3.50,157.50\n"));

        let exports: i64 = t
            .store()
            .conn
            .query_row("SELECT COUNT(*) FROM log WHERE operation = 'export'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(exports, 1);
    }

    #[test]
    fn json_export_carries_rows_and_totals() {
        let t = tracker_with_history();
        let dir = tempfile::tempdir().unwrap();
        let report = ExportLogic::build_report(t.store(), &period_of(dt(1, 22, 9, 0))).unwrap();

        let path = ExportLogic::export(t.store(), &report, ExportFormat::Json, dir.path(), false)
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["rows"][0]["memo"], "work");
        assert_eq!(value["totals"]["total_earnings"], 45.0);
        assert_eq!(value["period"]["start"], "2024-01-19T00:00:00");
    }

    #[test]
    fn missing_directory_is_refused() {
        let t = tracker_with_history();
        let report = ExportLogic::build_report(t.store(), &period_of(dt(1, 5, 9, 0))).unwrap();
        let err = ExportLogic::export(
            t.store(),
            &report,
            ExportFormat::Csv,
            Path::new("/nonexistent/rtimeclock"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }
}
