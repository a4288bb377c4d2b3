//! Command line interface for lovebrew.
//!
//! This module provides the CLI for bundler operations, with argument
//! parsing, command execution, and user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BundleArgs, Command, ConvertArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{BundlerError, CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Validates and executes already parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    let runtime_config = RuntimeConfig::from(args);

    match &args.command {
        Command::Bundle(bundle_args) => commands::bundle(bundle_args, &runtime_config).await,
        Command::Convert(convert_args) => commands::convert(convert_args, &runtime_config).await,
    }
}
