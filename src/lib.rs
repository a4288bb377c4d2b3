//! Console bundler library for LÖVE Potion games
//!
//! This library provides the core bundling functionality for creating:
//! - Nintendo 3DS homebrew (`.3dsx`, target `ctr`)
//! - Nintendo Switch homebrew (`.nro`, target `hac`)
//! - Nintendo Wii U homebrew (`.wuhb`, target `cafe`)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
