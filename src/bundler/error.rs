//! Error types for bundling operations.
//!
//! Every failure a target pipeline can hit is a variant of [`Error`]. The
//! orchestrator never propagates these past a single target; it folds them
//! into a [`TargetOutcome`](crate::bundler::TargetOutcome) using
//! [`Error::kind`] so callers can still tell failure classes apart.

use serde::Serialize;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of an image violated a size constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Width,
    Height,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Width => f.write_str("width"),
            Side::Height => f.write_str("height"),
        }
    }
}

/// Whether an image side exceeded the upper or fell below the lower limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    TooLarge,
    TooSmall,
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::TooLarge => f.write_str("too large"),
            Bound::TooSmall => f.write_str("too small"),
        }
    }
}

/// Errors produced while bundling.
#[derive(Debug, Error)]
pub enum Error {
    /// Project configuration is missing a required value.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The configuration lists no targets at all.
    #[error("no targets configured")]
    NoTargetsConfigured,

    /// A target identifier that no platform descriptor exists for.
    #[error("unknown target `{0}`")]
    UnknownTarget(String),

    #[error("invalid icon dimensions for {target}: expected {expected}x{expected}, got {width}x{height}")]
    InvalidIconDimensions {
        target: String,
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid icon format for {target}: {reason}")]
    InvalidIconFormat { target: String, reason: String },

    #[error("invalid icon type for {target}: expected {expected}, got `{found}`")]
    InvalidIconType {
        target: String,
        expected: String,
        found: String,
    },

    /// Image outside the texture size limits.
    #[error("image '{}' {side} is {bound} ({size} pixels, limit {limit})", .path.display())]
    InvalidTexture {
        path: PathBuf,
        side: Side,
        bound: Bound,
        size: u32,
        limit: u32,
    },

    /// Image that could not be decoded at all.
    #[error("error loading '{}': {reason}", .path.display())]
    UndecodableImage { path: PathBuf, reason: String },

    #[error("error loading font '{}': {reason}", .path.display())]
    InvalidFont { path: PathBuf, reason: String },

    #[error("'{}' is not a valid image or font file", .0.display())]
    UnsupportedMedia(PathBuf),

    /// The OS refused to start an external tool.
    #[error("failed to start `{program}`: {error}")]
    ProcessLaunchFailure {
        program: String,
        #[source]
        error: std::io::Error,
    },

    /// The tool ran but its expected output never appeared.
    #[error("`{program}` did not create {}", .output.display())]
    OutputMissing { program: String, output: PathBuf },

    #[error("`{program}` timed out after {}s", .timeout.as_secs())]
    ProcessTimeout { program: String, timeout: Duration },

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    GenericError(String),
}

/// Failure classes surfaced in build outcomes and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConfigInvalid,
    UnknownTarget,
    InvalidIconDimensions,
    InvalidIconFormat,
    InvalidIconType,
    InvalidMedia,
    ProcessLaunchFailure,
    OutputMissing,
    ProcessTimeout,
    IoFailure,
}

impl Error {
    /// Classifies this error for outcome reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::ConfigInvalid(_) | Error::NoTargetsConfigured => FailureKind::ConfigInvalid,
            Error::UnknownTarget(_) => FailureKind::UnknownTarget,
            Error::InvalidIconDimensions { .. } => FailureKind::InvalidIconDimensions,
            Error::InvalidIconFormat { .. } => FailureKind::InvalidIconFormat,
            Error::InvalidIconType { .. } => FailureKind::InvalidIconType,
            Error::InvalidTexture { .. }
            | Error::UndecodableImage { .. }
            | Error::InvalidFont { .. }
            | Error::UnsupportedMedia(_) => FailureKind::InvalidMedia,
            Error::ProcessLaunchFailure { .. } => FailureKind::ProcessLaunchFailure,
            Error::OutputMissing { .. } => FailureKind::OutputMissing,
            Error::ProcessTimeout { .. } => FailureKind::ProcessTimeout,
            Error::Fs { .. }
            | Error::IoError(_)
            | Error::Zip(_)
            | Error::WalkDir(_)
            | Error::StripPrefix(_)
            | Error::Json(_)
            | Error::GenericError(_) => FailureKind::IoFailure,
        }
    }
}

/// Attaches the failing operation and path to IO errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
