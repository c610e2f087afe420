//! Diagnostic logging setup.
//!
//! Logging is off unless `RTIMECLOCK_LOG` holds a filter (e.g. `debug` or
//! `rtimeclock=trace`). Output goes to `rtimeclock.log` inside the config
//! directory: stderr belongs to the dashboard while it is on screen.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;

pub const LOG_ENV: &str = "RTIMECLOCK_LOG";
pub const LOG_FILE: &str = "rtimeclock.log";

pub fn init(log_dir: &Path) {
    let filter = match env::var(LOG_ENV) {
        Ok(f) if !f.trim().is_empty() => f,
        _ => {
            let _ = env_logger::Builder::new()
                .filter_level(log::LevelFilter::Off)
                .try_init();
            return;
        }
    };

    let file = fs::create_dir_all(log_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(LOG_FILE))
    });

    match file {
        Ok(file) => {
            let _ = env_logger::Builder::new()
                .parse_filters(&filter)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
            log::info!("=== rtimeclock {} logging enabled ===", env!("CARGO_PKG_VERSION"));
        }
        Err(e) => {
            eprintln!(
                "⚠️  Cannot open log file in {}: {} (logging disabled)",
                log_dir.display(),
                e
            );
        }
    }
}
