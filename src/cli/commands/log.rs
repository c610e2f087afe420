use crate::cli::parser::Commands;
use crate::config::AppPaths;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, paths: &AppPaths) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = DbPool::open(&paths.database)?;
        LogLogic::print_log(&pool)?;
    }

    Ok(())
}
