// src/export/csv.rs

use crate::errors::AppResult;
use crate::export::model::ExportReport;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use csv::Writer;
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 4] = ["start_time", "end_time", "duration_hours", "earnings"];

/// One record per session, then a `TOTAL` record.
pub fn write_csv<W: Write>(out: W, report: &ExportReport) -> AppResult<()> {
    let mut wtr = Writer::from_writer(out);

    wtr.write_record(CSV_HEADER)?;

    for row in &report.rows {
        wtr.write_record([
            row.start_time.clone(),
            row.end_time.clone(),
            format!("{:.2}", row.duration_hours()),
            format!("{:.2}", row.earnings),
        ])?;
    }

    wtr.write_record([
        "TOTAL".to_string(),
        String::new(),
        format!("{:.2}", report.totals.total_hours()),
        format!("{:.2}", report.totals.total_earnings),
    ])?;

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_csv(report: &ExportReport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let file = std::fs::File::create(path)?;
    write_csv(file, report)?;

    notify_export_success("CSV", path);
    Ok(())
}
