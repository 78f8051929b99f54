//! CLI entrypoint for `flow-splitter`.

mod cli;
mod commands;
mod error;
mod telemetry;

use clap::Parser;

use crate::cli::Args;
use crate::error::CliError;

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    telemetry::init(args.is_verbose)?;
    commands::run(&args)
}
