mod common;
use common::{Sandbox, dt, seed_history};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn init_creates_the_database() {
    let sb = Sandbox::new();

    sb.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Database initialized"))
        .stdout(contains("initialization completed"));

    assert!(sb.db.exists());
}

#[test]
fn missing_config_is_created_with_defaults() {
    let sb = Sandbox::new();
    fs::remove_file(&sb.config).expect("remove config");

    sb.cmd()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("billing_cycle_type: biweekly"))
        .stdout(contains("pay_period_anchor"))
        .stdout(contains("1970-01-02"));

    assert!(sb.config.exists());
}

#[test]
fn malformed_config_aborts() {
    let sb = Sandbox::with_config("hourly_rate: [1, 2\n");

    sb.cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("Configuration error"));

    assert!(!sb.db.exists());
}

#[test]
fn anchor_must_be_a_friday() {
    let sb = Sandbox::with_config("pay_period_anchor: 2024-01-04\n");

    sb.cmd()
        .arg("periods")
        .assert()
        .failure()
        .stderr(contains("is not a Friday"));
}

#[test]
fn config_check_and_migrate_fill_missing_keys() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("is missing"))
        .stdout(contains("billing_cycle_type"));

    sb.cmd()
        .args(["config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Configuration updated"));

    let content = fs::read_to_string(&sb.config).expect("read config");
    assert!(content.contains("hourly_rate: 45"));
    assert!(content.contains("refresh_interval_secs: 1"));

    sb.cmd()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("is complete"));
}

#[test]
fn status_when_idle_shows_period_history() {
    let sb = Sandbox::new();
    seed_history(&sb);

    sb.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("TIMECLOCK TERMINAL"))
        .stdout(contains("Status: Not clocked in"))
        .stdout(contains("Hourly Rate: $45.00"))
        .stdout(contains("Session Earnings: $0.00"));
}

#[test]
fn status_shows_an_open_session_without_closing_it() {
    let sb = Sandbox::new();
    sb.leave_open(45.0, dt(1, 5, 9, 0));

    sb.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Current Hour Progress:"))
        .stdout(contains("Clocked In: 09:00 AM"));

    // still open afterwards
    sb.cmd()
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("(0 closed, 1 open)"));
}

#[test]
fn periods_lists_newest_first() {
    let sb = Sandbox::new();
    seed_history(&sb);

    let out = sb.cmd().arg("periods").assert().success();
    let text = String::from_utf8(out.get_output().stdout.clone()).expect("utf8");

    assert!(text.contains("biweekly cycle"));
    let newer = text.find("2024-01-19").expect("newer period listed");
    let older = text.find("2024-01-05").expect("older period listed");
    assert!(newer < older);
    assert!(text.contains("$157.50"));
}

#[test]
fn periods_follow_the_configured_cycle() {
    let sb = Sandbox::with_config(
        "hourly_rate: 45\nbilling_cycle_type: weekly\npay_period_anchor: 2024-01-05\n",
    );
    seed_history(&sb);

    sb.cmd()
        .arg("periods")
        .assert()
        .success()
        .stdout(contains("weekly cycle"))
        .stdout(contains("2024-01-11"))
        .stdout(contains("2024-01-25"));
}

#[test]
fn periods_without_history() {
    let sb = Sandbox::new();

    sb.cmd()
        .arg("periods")
        .assert()
        .success()
        .stdout(contains("No pay periods with recorded sessions."));
}

#[test]
fn list_groups_sessions_by_day() {
    let sb = Sandbox::new();
    seed_history(&sb);

    sb.cmd()
        .args(["list", "--period", "2024-01-12"])
        .assert()
        .success()
        .stdout(contains("Pay Period 01/05 - 01/18"))
        .stdout(contains("Friday 2024-01-05"))
        .stdout(contains("Monday 2024-01-08"))
        .stdout(contains("planning"))
        .stdout(contains("review").not())
        .stdout(contains("Closed sessions: 2"));
}

#[test]
fn list_marks_the_open_session() {
    let sb = Sandbox::new();
    sb.leave_open(45.0, dt(1, 9, 8, 0));

    sb.cmd()
        .args(["list", "--period", "2024-01-09"])
        .assert()
        .success()
        .stdout(contains("ACTIVE"))
        .stdout(contains("Clocked in since 2024-01-09 08:00"));
}

#[test]
fn invalid_period_date_is_rejected() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["list", "--period", "05/01/2024"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn db_info_and_check() {
    let sb = Sandbox::new();
    seed_history(&sb);

    sb.cmd()
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("(3 closed, 0 open)"))
        .stdout(contains("$202.50"))
        .stdout(contains("Integrity check passed."));
}

#[test]
fn log_print_shows_clock_transitions() {
    let sb = Sandbox::new();
    seed_history(&sb);

    sb.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("Internal log"))
        .stdout(contains("clock_in"))
        .stdout(contains("clock_out"))
        .stdout(contains("migration_applied"));
}

#[test]
fn dashboard_without_a_terminal_records_no_session() {
    let sb = Sandbox::with_config("hourly_rate: 45\nauto_clock_in: true\n");

    for _ in 0..2 {
        sb.cmd()
            .assert()
            .failure()
            .stderr(contains("interactive terminal"));
    }

    sb.cmd()
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("(0 closed, 0 open)"));

    sb.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("clock_in").not());
}

#[test]
fn config_migrate_is_recorded_in_the_log() {
    let sb = Sandbox::new();

    sb.cmd().args(["config", "--migrate"]).assert().success();

    sb.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("(migrate)"))
        .stdout(contains("billing_cycle_type"));
}
