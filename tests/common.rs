#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rtimeclock::core::tracker::SessionTracker;
use rtimeclock::db::pool::DbPool;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated home directory holding a config file and a database.
pub struct Sandbox {
    pub home: TempDir,
    pub config: PathBuf,
    pub db: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_config("hourly_rate: 45\nauto_clock_in: false\n")
    }

    pub fn with_config(content: &str) -> Self {
        let home = tempfile::tempdir().expect("create temp home");
        let dir = home.path().join(".rtimeclock");
        fs::create_dir_all(&dir).expect("create config dir");

        let config = dir.join("rtimeclock.conf");
        fs::write(&config, content).expect("write config");

        let db = dir.join("test.sqlite");
        Self { home, config, db }
    }

    /// The binary, pointed at this sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rtimeclock");
        cmd.env("HOME", self.home.path())
            .env_remove("RTIMECLOCK_LOG")
            .arg("--config")
            .arg(&self.config)
            .arg("--db")
            .arg(&self.db);
        cmd
    }

    pub fn out_dir(&self) -> PathBuf {
        let dir = self.home.path().join("exports");
        fs::create_dir_all(&dir).expect("create export dir");
        dir
    }

    /// Record closed sessions `(from, to, memo)` through the library.
    pub fn record(&self, rate: f64, sessions: &[(NaiveDateTime, NaiveDateTime, &str)]) {
        let pool = DbPool::open(&self.db).expect("open db");
        let mut tracker = SessionTracker::new(pool, rate).expect("tracker");
        for (from, to, memo) in sessions {
            tracker.clock_in_at(*from).expect("clock in");
            let memo = (!memo.is_empty()).then_some(*memo);
            tracker.clock_out_at(*to, memo).expect("clock out");
        }
    }

    /// Leave a session open, as a process killed mid-session would.
    pub fn leave_open(&self, rate: f64, from: NaiveDateTime) {
        let pool = DbPool::open(&self.db).expect("open db");
        let mut tracker = SessionTracker::new(pool, rate).expect("tracker");
        tracker.clock_in_at(from).expect("clock in");
    }
}

pub fn dt(m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, d)
        .and_then(|d| d.and_hms_opt(h, mi, 0))
        .expect("valid datetime")
}

/// Two sessions in the 2024-01-05 pay period, one in the next.
pub fn seed_history(sb: &Sandbox) {
    sb.record(
        45.0,
        &[
            (dt(1, 5, 9, 0), dt(1, 5, 11, 30), "planning"),
            (dt(1, 8, 13, 0), dt(1, 8, 14, 0), ""),
            (dt(1, 22, 9, 0), dt(1, 22, 10, 0), "review"),
        ],
    );
}
