//! `petcare` command entry point.
//!
//! # Responsibility
//! - Resolve store and logging settings (flags over environment).
//! - Open the store and run exactly one subcommand.
//! - Report failures as one line on stderr with a non-zero exit code.

mod args;
mod commands;

use anyhow::{anyhow, Result};
use args::Cli;
use chrono::Local;
use clap::Parser;
use log::{error, info};
use petcare_core::db::open_db;
use petcare_core::{init_from_config, LogConfig, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Some(dir) = cli.log_dir {
        log_config.dir = Some(dir);
    }
    init_from_config(&log_config)?;

    let mut store = StoreConfig::from_env();
    if let Some(path) = cli.db {
        store.db_path = path;
    }
    let conn = open_db(&store.db_path)
        .map_err(|err| anyhow!("cannot open store `{}`: {err}", store.db_path.display()))?;

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let command_name = cli.command.name();

    let mut stdout = std::io::stdout().lock();
    match commands::execute(&conn, cli.command, today, &mut stdout) {
        Ok(()) => {
            info!("event=cli_command module=cli status=ok command={command_name}");
            Ok(())
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command_name}");
            Err(err)
        }
    }
}
