//! Formatting utilities used for CLI, dashboard and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// `$1,234.56`
pub fn money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// `HH:MM:SS`, hours are not wrapped at 24.
pub fn hms(secs: i64) -> String {
    let s = secs.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Decimal hours with two digits, as used by the CSV export.
pub fn hours(secs: i64) -> String {
    format!("{:.2}", crate::utils::time::seconds_to_hours(secs))
}

/// Text progress bar for the current hour of worked time:
/// `[██████░░░░░░░░░░░░░░] 18:05/60:00`
pub fn hour_bar(elapsed_secs: i64, width: usize) -> String {
    let in_hour = elapsed_secs.max(0) % 3600;
    let filled = (in_hour as usize * width) / 3600;

    let bar: String = "█".repeat(filled) + &"░".repeat(width - filled);
    format!("[{}] {}", bar, hour_clock(elapsed_secs))
}

/// `MM:SS/60:00` position inside the current worked hour.
pub fn hour_clock(elapsed_secs: i64) -> String {
    let in_hour = elapsed_secs.max(0) % 3600;
    format!("{:02}:{:02}/60:00", in_hour / 60, in_hour % 60)
}
