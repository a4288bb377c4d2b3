//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! packaging pipeline for every configured console.
//!
//! # Overview
//!
//! The bundler:
//! 1. Rejects configurations without targets
//! 2. Warns about devkitPro tools missing from the system
//! 3. Creates `<output>/<target>/` for every known target
//! 4. Runs the [`TargetPipeline`] for it, sequentially or in parallel
//! 5. Returns one [`TargetOutcome`] per requested target
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`outcome`] - [`TargetOutcome`] and pipeline [`Stage`]s
//! - [`pipeline`] - Per-target state machine
//! - [`report`] - JSON run summary

mod checksum;
mod orchestrator;
mod outcome;
mod pipeline;
mod report;

pub use checksum::calculate_sha256;
pub use orchestrator::Bundler;
pub use outcome::{Stage, TargetOutcome};
pub use pipeline::TargetPipeline;
pub use report::BuildReport;

use crate::bundler::tool::{DEFAULT_TOOL_TIMEOUT, Toolchain};
use std::{path::PathBuf, time::Duration};

/// Knobs for a bundling run.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Root for `<target>/` build directories. Default: the project directory.
    pub output_dir: Option<PathBuf>,
    /// Where devkitPro tools are looked up.
    pub toolchain: Toolchain,
    /// Upper bound for a single external tool run.
    pub tool_timeout: Duration,
    /// Build all targets concurrently.
    pub parallel: bool,
    /// Append the zipped, converted game assets to each executable.
    pub merge_assets: bool,
    /// Keep the staged asset directory and `<title>-bundle.zip`.
    pub keep_intermediates: bool,
    /// Fail a target when any of its media files fails to convert.
    pub strict_media: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            toolchain: Toolchain::system(),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
            parallel: false,
            merge_assets: true,
            keep_intermediates: false,
            strict_media: false,
        }
    }
}
