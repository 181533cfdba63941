//! Application entry point.
//!
//! Parses command-line arguments, installs the log subscriber and hands the
//! command to [`runner::run`].

use clap::Parser;
use cmake_to_bazel::{cli::Cli, runner};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

/// Logs go to stderr so `generate -` keeps stdout clean.
fn init_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::WARN };
    fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_max_level(max_level)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse().with_default_command();
    init_logging(cli.verbose);
    runner::run(&cli).map_or_else(
        |err| {
            tracing::error!("{}", runner::render_error(&err));
            ExitCode::FAILURE
        },
        |()| ExitCode::SUCCESS,
    )
}
