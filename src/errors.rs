//! Unified application error type.
//! All modules (db, core, cli, ui) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Illegal transitions of the clock-in/clock-out state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("already clocked in since {since}")]
    AlreadyClockedIn { since: String },

    #[error("not clocked in")]
    NotClockedIn,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Invalid timestamp in storage: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    // ---------------------------
    // Session state
    // ---------------------------
    #[error("Session error: {0}")]
    State(#[from] StateError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("No closed sessions in pay period {start} - {end}")]
    EmptyPeriod { start: String, end: String },

    #[error("No pay periods with recorded sessions")]
    NoPayPeriods,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
