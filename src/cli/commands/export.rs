use crate::cli::parser::Commands;
use crate::config::{AppPaths, Config};
use crate::core::period::PayPeriodCalculator;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::ui::messages::info;
use crate::ui::prompt::select_period;
use crate::utils::date::require_date;
use crate::utils::formatting::{hours, money};
use std::io;
use std::path::PathBuf;

pub fn handle(cmd: &Commands, cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    if let Commands::Export {
        period,
        format,
        dir,
        force,
    } = cmd
    {
        let policy = cfg.billing_policy()?;
        let pool = DbPool::open(&paths.database)?;

        let period = match period {
            Some(d) => PayPeriodCalculator::period_for_date(require_date(d)?, &policy),
            None => {
                let available = ExportLogic::available_periods(&pool, &policy)?;
                if available.is_empty() {
                    return Err(AppError::NoPayPeriods);
                }

                let stdin = io::stdin();
                match select_period(&available, &mut stdin.lock(), &mut io::stdout())? {
                    Some(i) => available[i].period,
                    None => {
                        info("Export cancelled.");
                        return Ok(());
                    }
                }
            }
        };

        let report = ExportLogic::build_report(&pool, &period)?;
        let out_dir = dir.clone().unwrap_or_else(|| PathBuf::from("."));
        ExportLogic::export(&pool, &report, *format, &out_dir, *force)?;

        info(format!(
            "{}: {} sessions, {} h, {}",
            period.label(),
            report.totals.closed_sessions,
            hours(report.totals.total_seconds),
            money(report.totals.total_earnings)
        ));
    }
    Ok(())
}
