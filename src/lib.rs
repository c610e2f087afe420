//! rTimeclock library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::{AppPaths, Config};
use errors::AppResult;

/// Central command dispatcher; no subcommand opens the dashboard.
pub fn dispatch(cli: &Cli, cfg: &Config, paths: &AppPaths) -> AppResult<()> {
    match &cli.command {
        None => ui::dashboard::run_dashboard(cfg, &paths.database),
        Some(cmd) => match cmd {
            Commands::Init => cli::commands::init::handle(cfg, paths),
            Commands::Status => cli::commands::status::handle(cfg, paths),
            Commands::Periods => cli::commands::periods::handle(cfg, paths),
            Commands::List { .. } => cli::commands::list::handle(cmd, cfg, paths),
            Commands::Export { .. } => cli::commands::export::handle(cmd, cfg, paths),
            Commands::Config { .. } => cli::commands::config::handle(cmd, cfg, paths),
            Commands::Db { .. } => cli::commands::db::handle(cmd, paths),
            Commands::Log { .. } => cli::commands::log::handle(cmd, paths),
        },
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let (config_file, config_dir) = AppPaths::config_location(cli.config.as_deref());
    utils::logging::init(&config_dir);

    // loaded once; a malformed file stops here
    let cfg = Config::load_or_create(&config_file)?;
    let paths = AppPaths::resolve(config_file, config_dir, &cfg, cli.db.as_deref());
    log::debug!("database: {}", paths.database.display());

    dispatch(&cli, &cfg, &paths)
}
