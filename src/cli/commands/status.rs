use crate::config::{AppPaths, Config};
use crate::core::tracker::SessionTracker;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::view::DashboardView;
use crate::utils::formatting::bold;
use crate::utils::time;

/// One-shot, non-interactive rendering of the dashboard text.
pub fn handle(cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    let policy = cfg.billing_policy()?;
    let pool = DbPool::open(&paths.database)?;
    let tracker = SessionTracker::new(pool, cfg.hourly_rate)?;

    let view = DashboardView::capture(&tracker, &policy, time::now())?;

    println!("{}\n", bold("TIMECLOCK TERMINAL"));
    for line in view.lines() {
        println!("{line}");
    }
    Ok(())
}
