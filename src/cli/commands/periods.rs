use crate::config::{AppPaths, Config};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;
use crate::utils::formatting::{hours, money};
use crate::utils::table::{Column, Table};

pub fn handle(cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    let policy = cfg.billing_policy()?;
    let pool = DbPool::open(&paths.database)?;

    let periods = ExportLogic::available_periods(&pool, &policy)?;
    if periods.is_empty() {
        info("No pay periods with recorded sessions.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("From"),
        Column::left("To"),
        Column::right("Sessions"),
        Column::right("Hours"),
        Column::right("Earnings"),
    ]);

    for (i, p) in periods.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            p.period.start_date().to_string(),
            p.period.end_date().to_string(),
            p.totals.closed_sessions.to_string(),
            hours(p.totals.total_seconds),
            money(p.totals.total_earnings),
        ]);
    }

    println!(
        "📅 Pay periods ({} cycle):\n",
        policy.cycle.as_str()
    );
    print!("{}", table.render());
    Ok(())
}
