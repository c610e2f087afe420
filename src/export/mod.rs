// src/export/mod.rs

mod csv;
mod fs_utils;
mod json;
pub mod logic;
pub mod model;

pub use csv::{CSV_HEADER, write_csv};
pub use logic::{ExportLogic, PeriodSummary};
pub use model::{ExportReport, ExportRow};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every export format.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}
