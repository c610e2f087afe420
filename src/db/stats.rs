use crate::db::pool::DbPool;
use crate::db::queries::session_stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW, colorize_optional};
use crate::utils::formatting::{hours, money};
use std::fs;
use std::path::Path;

pub fn print_db_info(pool: &DbPool, db_path: &Path) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path.display(), RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) SESSIONS
    //
    let (total, closed, first, last) = session_stats(&pool.conn)?;
    println!(
        "{}• Sessions:{} {}{}{} ({} closed, {} open)",
        CYAN,
        RESET,
        GREEN,
        total,
        RESET,
        closed,
        total - closed
    );

    //
    // 3) DATE RANGE
    //
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", colorize_optional(first.as_deref()));
    println!("    to:   {}", colorize_optional(last.as_deref()));

    //
    // 4) TOTALS OVER CLOSED SESSIONS
    //
    let (secs, earned): (i64, f64) = pool.conn.query_row(
        "SELECT
            IFNULL(SUM(strftime('%s', end_time) - strftime('%s', start_time)), 0),
            IFNULL(SUM(earnings), 0.0)
         FROM sessions
         WHERE end_time IS NOT NULL",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!("{}• Hours logged:{} {}", CYAN, RESET, hours(secs));
    println!("{}• Earnings:{} {}", CYAN, RESET, money(earned));

    println!();
    Ok(())
}
