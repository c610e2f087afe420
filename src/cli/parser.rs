use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rTimeclock
/// Personal timeclock: sessions, pay-period earnings and a live dashboard
#[derive(Parser)]
#[command(
    name = "rtimeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal timeclock: clock in, watch your earnings live, export pay periods to CSV",
    long_about = "Without a subcommand rtimeclock opens the live dashboard (clocking in \
                  automatically when auto_clock_in is set). Quit with q, Esc or Ctrl+C."
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db", value_name = "FILE")]
    pub db: Option<String>,

    /// Use another configuration file
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Print the current session and pay-period earnings once
    Status,

    /// List pay periods that hold recorded sessions
    Periods,

    /// List the sessions of a pay period, grouped by day
    List {
        #[arg(
            long,
            short,
            value_name = "YYYY-MM-DD",
            help = "Any date inside the pay period (default: today)"
        )]
        period: Option<String>,
    },

    /// Export the sessions of a pay period
    Export {
        #[arg(
            long,
            short,
            value_name = "YYYY-MM-DD",
            help = "Any date inside the pay period (default: choose interactively)"
        )]
        period: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(
            long,
            value_name = "DIR",
            help = "Output directory (default: current directory)"
        )]
        dir: Option<PathBuf>,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
