use crate::cli::parser::Commands;
use crate::config::{AppPaths, Config};
use crate::core::earnings::EarningsAggregator;
use crate::core::period::PayPeriodCalculator;
use crate::core::store::SessionStore;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::{PayPeriod, Session};
use crate::utils::colors::colorize_state;
use crate::utils::date::{require_date, today, weekday_name};
use crate::utils::formatting::{hms, hours, money};
use crate::utils::table::{Column, Table};
use crate::utils::time;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    if let Commands::List { period } = cmd {
        let policy = cfg.billing_policy()?;
        let pool = DbPool::open(&paths.database)?;

        let date = match period {
            Some(d) => require_date(d)?,
            None => today(),
        };
        let period = PayPeriodCalculator::period_for_date(date, &policy);

        let mut sessions = pool.closed_sessions_between(period.start, period.end)?;
        if let Some(open) = pool.open_session()?
            && period.contains(open.start_time)
        {
            sessions.push(open);
        }

        print_period(&period, &sessions);
    }
    Ok(())
}

fn group_by_day(sessions: &[Session]) -> BTreeMap<NaiveDate, Vec<&Session>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Session>> = BTreeMap::new();
    for s in sessions {
        days.entry(s.start_time.date()).or_default().push(s);
    }
    days
}

fn print_period(period: &PayPeriod, sessions: &[Session]) {
    println!("\n=== {} ({}) ===", period.label(), period);

    if sessions.is_empty() {
        println!("No sessions in this pay period.");
        return;
    }

    let now = time::now();

    for (day, day_sessions) in group_by_day(sessions) {
        let day_total: f64 = day_sessions.iter().map(|s| s.earnings_at(now)).sum();
        println!(
            "\n{} {} | {} session(s) | {}",
            weekday_name(day.weekday()),
            day,
            day_sessions.len(),
            money(day_total)
        );

        let mut table = Table::new(vec![
            Column::right("#"),
            Column::left("Start"),
            Column::left("End"),
            Column::right("Duration"),
            Column::right("Earnings"),
            Column::left("Memo"),
        ]);

        for s in day_sessions {
            let end = match s.end_time {
                Some(e) => e.format("%H:%M:%S").to_string(),
                None => "ACTIVE".to_string(),
            };
            table.add_row(vec![
                s.id.to_string(),
                s.start_time.format("%H:%M:%S").to_string(),
                end,
                hms(s.duration_seconds_at(now)),
                money(s.earnings_at(now)),
                s.memo.clone(),
            ]);
        }

        print!("{}", table.render());
    }

    if let Some(open) = sessions.iter().find(|s| s.is_active()) {
        println!(
            "\n{}",
            colorize_state(
                &format!("● Clocked in since {}", open.start_time.format("%Y-%m-%d %H:%M")),
                true
            )
        );
    }

    let closed: Vec<Session> = sessions.iter().filter(|s| !s.is_active()).cloned().collect();
    let totals = EarningsAggregator::summarize(&closed);
    println!(
        "\nClosed sessions: {} | {} h | {}",
        totals.closed_sessions,
        hours(totals.total_seconds),
        money(totals.total_earnings)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn session(id: i64, start: NaiveDateTime) -> Session {
        Session {
            id,
            start_time: start,
            end_time: Some(start + chrono::TimeDelta::hours(1)),
            hourly_rate: 10.0,
            earnings: Some(10.0),
            memo: String::new(),
        }
    }

    #[test]
    fn sessions_are_grouped_by_start_day_in_order() {
        let d = |day: u32, h: u32| {
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let sessions = vec![session(1, d(5, 9)), session(2, d(5, 14)), session(3, d(8, 9))];

        let days = group_by_day(&sessions);
        let keys: Vec<u32> = days.keys().map(|k| k.day()).collect();
        assert_eq!(keys, vec![5, 8]);
        assert_eq!(days[&NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()].len(), 2);
    }
}
