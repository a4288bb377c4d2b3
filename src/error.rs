//! Error types for the `lovebrew` command line tool.
//!
//! Library failures arrive as [`crate::bundler::Error`] and are wrapped here
//! together with argument and IO errors from the CLI layer.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Actionable hints printed below the error message.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error;

        match self {
            BundlerError::Bundler(Error::ConfigInvalid(_)) => vec![
                "Check that lovebrew.toml has title, author, description and version under [metadata]"
                    .to_string(),
            ],
            BundlerError::Bundler(Error::NoTargetsConfigured) => vec![
                "Add at least one of \"ctr\", \"hac\" or \"cafe\" to [build] targets".to_string(),
            ],
            BundlerError::Bundler(Error::ProcessLaunchFailure { .. }) => vec![
                "Install devkitPro or pass --tools-dir pointing at its tools/bin".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
