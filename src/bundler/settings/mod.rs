//! Configuration structures for bundling operations.
//!
//! [`BuildConfig`] is the immutable project configuration every target
//! pipeline reads from. It is assembled through [`BuildConfigBuilder`], which
//! is also what the `lovebrew.toml` loader in [`crate::metadata`] feeds.

mod builder;
mod core;
mod package;

pub use builder::BuildConfigBuilder;
pub use core::{BuildConfig, DEFAULT_SOURCE_DIR};
pub use package::PackageSettings;
