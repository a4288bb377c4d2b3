//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! of the values clap cannot check on its own.

use clap::{Parser, Subcommand};
use std::{path::PathBuf, time::Duration};

/// Console bundler for LÖVE Potion games
#[derive(Parser, Debug)]
#[command(
    name = "lovebrew",
    version,
    about = "Console bundler for LÖVE Potion games",
    long_about = "Packages a LÖVE game into homebrew executables for the Nintendo 3DS (ctr), \
Switch (hac) and Wii U (cafe).

Usage:
  lovebrew bundle
  lovebrew bundle ./my-game --output ./build --parallel
  lovebrew convert game/sprites game/font.ttf --delete

Exit code 0 = every configured target was built."
)]
pub struct Args {
    /// Only print errors and the final summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print every step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every target listed in lovebrew.toml
    Bundle(BundleArgs),

    /// Convert images and fonts to console formats
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
pub struct BundleArgs {
    /// Project directory containing lovebrew.toml
    #[arg(value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Root directory for the per-target build directories
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory with the per-target default icons and runtime binaries
    #[arg(long, value_name = "DIR", env = "LOVEBREW_RESOURCES")]
    pub resources_dir: Option<PathBuf>,

    /// Directory containing the devkitPro tools (default: PATH)
    #[arg(long, value_name = "DIR", env = "LOVEBREW_TOOLS_DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Timeout for a single external tool run, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub timeout: u64,

    /// Build all targets concurrently
    #[arg(short, long)]
    pub parallel: bool,

    /// Do not append the game assets to the executables
    #[arg(long)]
    pub no_merge: bool,

    /// Keep the staged assets and the bundle zip
    #[arg(long)]
    pub keep_intermediates: bool,

    /// Fail a target if any media file fails to convert
    #[arg(long)]
    pub strict_media: bool,

    /// Write a JSON build report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Files or directories to convert
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Delete the source files after converting
    #[arg(long)]
    pub delete: bool,

    /// Directory containing the devkitPro tools (default: PATH)
    #[arg(long, value_name = "DIR", env = "LOVEBREW_TOOLS_DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Timeout for a single conversion, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub timeout: u64,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Bundle(args) => {
                validate_timeout(args.timeout)?;
                if args.no_merge && args.strict_media {
                    return Err("--strict-media has no effect with --no-merge".to_string());
                }
                if args.no_merge && args.keep_intermediates {
                    return Err("--keep-intermediates has no effect with --no-merge".to_string());
                }
                Ok(())
            }
            Command::Convert(args) => validate_timeout(args.timeout),
        }
    }
}

fn validate_timeout(secs: u64) -> Result<(), String> {
    if secs == 0 {
        return Err("Timeout must be at least one second".to_string());
    }
    Ok(())
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

impl BundleArgs {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl ConvertArgs {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
