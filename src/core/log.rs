use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    match Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(_) => s.to_string(),
    }
}

/// ANSI colour for each logged operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Red,
        "export" => Colour::Blue,
        "config" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

fn op_target(entry: &LogEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// One printable line; only the operation word is coloured.
fn format_entry(entry: &LogEntry, id_w: usize, date_w: usize, op_w: usize) -> String {
    let color = color_for_operation(&entry.operation);

    let plain = op_target(entry);
    let visible = if plain.chars().count() > OP_WIDTH_MAX {
        let mut s: String = plain.chars().take(OP_WIDTH_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let colored = match visible.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(visible.as_str()).to_string(),
    };

    // padding computed on the visible width, not on the escape codes
    let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}",
        entry.id,
        display_date(&entry.date),
        colored,
        padding,
        entry.message,
        id_w = id_w,
        date_w = date_w
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|e| display_date(&e.date).len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for entry in &entries {
            println!("{}", format_entry(entry, id_w, date_w, op_w));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operation: &str, target: &str) -> LogEntry {
        LogEntry {
            id: 7,
            date: "2024-01-05T09:00:00+01:00".into(),
            operation: operation.into(),
            target: target.into(),
            message: "Clocked in".into(),
        }
    }

    #[test]
    fn entries_pad_on_visible_width() {
        let line = format_entry(&entry("clock_in", "session 3"), 2, 25, 24);
        let plain = strip_ansi(&line);

        assert_eq!(
            plain,
            " 7: 2024-01-05T09:00:00+01:00 | clock_in (session 3)     => Clocked in"
        );
        assert_ne!(plain, line, "operation word should be coloured");
    }

    #[test]
    fn every_logged_operation_has_its_own_colour() {
        let ops = ["clock_in", "clock_out", "export", "config", "migration_applied", "init"];
        for op in ops {
            assert_ne!(color_for_operation(op), Colour::White, "{op}");
        }
        assert_eq!(color_for_operation("unknown"), Colour::White);
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(80);
        let line = strip_ansi(&format_entry(&entry("export", &long), 1, 1, OP_WIDTH_MAX));
        let op_part = line.split(" | ").nth(1).unwrap();
        let op_part = op_part.split(" => ").next().unwrap();

        assert_eq!(op_part.chars().count(), OP_WIDTH_MAX);
        assert!(op_part.ends_with("..."));
    }
}
