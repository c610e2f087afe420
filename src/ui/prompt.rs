//! Line-oriented prompts on stdin, generic over the reader/writer for tests.

use crate::errors::AppResult;
use crate::export::PeriodSummary;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET};
use crate::utils::formatting::money;
use std::io::{BufRead, Write};

fn read_trimmed<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask which period to export. Returns the index into `periods`, or `None`
/// when the user quits (`q`) or input ends.
pub fn select_period<R: BufRead, W: Write>(
    periods: &[PeriodSummary],
    input: &mut R,
    output: &mut W,
) -> AppResult<Option<usize>> {
    writeln!(output, "\nAvailable pay periods:\n")?;
    for (i, p) in periods.iter().enumerate() {
        let color = if p.totals.total_earnings > 0.0 { GREEN } else { GREY };
        writeln!(
            output,
            "{CYAN}{:>2}.{RESET} {} {GREY}({} to {}){RESET} - {color}{}{RESET} ({:.2} h, {} sessions)",
            i + 1,
            p.period.label(),
            p.period.start_date(),
            p.period.end_date(),
            money(p.totals.total_earnings),
            p.totals.total_hours(),
            p.totals.closed_sessions,
        )?;
    }

    loop {
        write!(output, "\nEnter pay period number (or 'q' to quit): ")?;
        output.flush()?;

        let Some(answer) = read_trimmed(input)? else {
            writeln!(output)?;
            return Ok(None);
        };

        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match answer.parse::<usize>() {
            Ok(n) if (1..=periods.len()).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => writeln!(output, "{RED}Invalid pay period number.{RESET}")?,
            Err(_) => writeln!(
                output,
                "{RED}Please enter a valid number or 'q' to quit.{RESET}"
            )?,
        }
    }
}

/// Optional memo for the session being closed; empty input skips it.
pub fn prompt_memo<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<Option<String>> {
    write!(
        output,
        "\n{CYAN}Add a memo for this session (press Enter to skip):{RESET}\n> "
    )?;
    output.flush()?;

    Ok(read_trimmed(input)?.filter(|m| !m.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::earnings::PeriodTotals;
    use crate::core::period::PayPeriodCalculator;
    use crate::models::BillingPolicy;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn periods() -> Vec<PeriodSummary> {
        [(1, 19), (1, 5)]
            .into_iter()
            .map(|(m, d)| PeriodSummary {
                period: PayPeriodCalculator::period_for_date(
                    NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
                    &BillingPolicy::biweekly(),
                ),
                totals: PeriodTotals {
                    total_seconds: 3600,
                    total_earnings: 45.0,
                    closed_sessions: 1,
                    includes_live: false,
                },
            })
            .collect()
    }

    #[test]
    fn picks_by_one_based_number() {
        let mut out = Vec::new();
        let got = select_period(&periods(), &mut Cursor::new("2\n"), &mut out).unwrap();
        assert_eq!(got, Some(1));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pay Period 01/19 - 02/01"));
        assert!(text.contains("Pay Period 01/05 - 01/18"));
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let mut out = Vec::new();
        let got = select_period(&periods(), &mut Cursor::new("0\nabc\n3\n1\n"), &mut out).unwrap();
        assert_eq!(got, Some(0));

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Enter pay period number").count(), 4);
        assert_eq!(text.matches("Invalid pay period number.").count(), 2);
    }

    #[test]
    fn quit_and_eof_cancel() {
        let mut out = Vec::new();
        assert_eq!(select_period(&periods(), &mut Cursor::new("Q\n"), &mut out).unwrap(), None);
        assert_eq!(select_period(&periods(), &mut Cursor::new(""), &mut out).unwrap(), None);
    }

    #[test]
    fn memo_is_trimmed_and_optional() {
        let mut out = Vec::new();
        assert_eq!(
            prompt_memo(&mut Cursor::new("  fixed bug #12 \n"), &mut out).unwrap(),
            Some("fixed bug #12".to_string())
        );
        assert_eq!(prompt_memo(&mut Cursor::new("\n"), &mut out).unwrap(), None);
        assert_eq!(prompt_memo(&mut Cursor::new(""), &mut out).unwrap(), None);
    }
}
