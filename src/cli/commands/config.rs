use crate::cli::parser::Commands;
use crate::config::{AppPaths, Config};
use crate::core::config::ConfigLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = &paths.config_file;

        if *print_config {
            ConfigLogic::print(path, cfg)?;
        }

        if *check {
            ConfigLogic::check(path)?;
        }

        if *migrate {
            let added = ConfigLogic::migrate(path)?;
            if !added.is_empty() {
                record(
                    paths,
                    "migrate",
                    &format!("Added {} to {}", added.join(", "), path.display()),
                );
            }
        }

        if *edit_config {
            let used = ConfigLogic::edit(path, editor.as_deref())?;
            record(
                paths,
                "edit",
                &format!("Edited {} with '{used}'", path.display()),
            );
        }
    }

    Ok(())
}

/// Changes to the file go to the internal log like every other operation.
fn record(paths: &AppPaths, target: &str, message: &str) {
    let result =
        DbPool::open(&paths.database).and_then(|pool| ttlog(&pool.conn, "config", target, message));

    if let Err(e) = result {
        warning(format!("Failed to write internal log: {e}"));
    }
}
