//! `outline` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging, dispatch subcommands.
//! - Map outcomes to exit codes: 0 ok, 1 findings, 2 errors.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| outline_core::default_log_level());
        if let Err(err) = outline_core::init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    log::info!(
        "event=cli_start module=cli status=ok core_version={}",
        outline_core::core_version()
    );

    match commands::run(cli.command) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
