use crate::config::{AppPaths, Config};
use crate::core::store::SessionStore;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// The configuration file is already in place (created with the defaults on
/// load if it was missing); this creates the database, applies pending
/// migrations and records the run in the internal log.
pub fn handle(cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    println!("⚙️  Initializing rTimeclock…");
    println!("📄 Config file : {}", paths.config_file.display());
    println!("🗄️  Database   : {}", paths.database.display());

    let pool = DbPool::open(&paths.database)?;
    pool.set_setting("hourly_rate", &format!("{:.2}", cfg.hourly_rate))?;

    success(format!("Database initialized at {}", paths.database.display()));

    if let Err(e) = ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", paths.database.display()),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 rTimeclock initialization completed!");
    Ok(())
}
