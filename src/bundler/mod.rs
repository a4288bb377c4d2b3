//! Console bundling for LÖVE Potion games.
//!
//! Packages a game directory into homebrew executables for the Nintendo 3DS
//! (`ctr`), Switch (`hac`) and Wii U (`cafe`).
//!
//! # Example
//!
//! ```no_run
//! use lovebrew_bundler::bundler::{
//!     BuildConfigBuilder, BundleOptions, Bundler, PackageSettings, PlatformRegistry, Result,
//! };
//!
//! # async fn example() -> Result<()> {
//! let config = BuildConfigBuilder::new()
//!     .project_dir(".")
//!     .package_settings(PackageSettings {
//!         title: "SuperGame".into(),
//!         author: "SuperAuthor".into(),
//!         description: "SuperDescription".into(),
//!         version: "0.1.0".into(),
//!     })
//!     .targets(["ctr", "hac"])
//!     .build()?;
//!
//! let bundler = Bundler::new(config, PlatformRegistry::from_env()?, BundleOptions::default());
//! let outcomes = bundler.build().await?;
//! assert!(outcomes.iter().all(|o| o.success));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod media;
pub mod platform;
pub mod settings;
pub mod tool;
pub mod utils;

pub use builder::{
    BuildReport, BundleOptions, Bundler, Stage, TargetOutcome, TargetPipeline, calculate_sha256,
};
pub use error::{Error, ErrorExt, FailureKind, Result};
pub use media::{ConversionReport, MediaConverter, MediaKind, validate_icon};
pub use platform::{PlatformDescriptor, PlatformRegistry, Target};
pub use settings::{BuildConfig, BuildConfigBuilder, PackageSettings};
pub use tool::{BuildStep, ProcessRunner, ToolRunner, Toolchain};
