//! Builder for constructing BuildConfig.

use super::{BuildConfig, DEFAULT_SOURCE_DIR, PackageSettings};
use crate::bundler::error::{Error, Result};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

/// Builder for constructing [`BuildConfig`].
///
/// Validation happens once in [`build`](Self::build): every metadata field
/// must be non-empty. An empty target list is accepted here and rejected by
/// the orchestrator, which owns that check.
#[derive(Default)]
pub struct BuildConfigBuilder {
    project_dir: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    source: Option<PathBuf>,
    targets: Vec<String>,
    icons: HashMap<String, PathBuf>,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project directory.
    ///
    /// Default: current directory
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets game metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the asset directory, relative to the project directory.
    ///
    /// Default: `game`
    pub fn source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target identifiers, in build order.
    pub fn targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a custom icon for one target identifier.
    pub fn icon<P: AsRef<Path>>(mut self, target: impl Into<String>, path: P) -> Self {
        self.icons.insert(target.into(), path.as_ref().to_path_buf());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigInvalid`] if the package settings are missing or any of
    /// title, author, description or version is empty, or a target
    /// identifier is empty or listed twice.
    pub fn build(self) -> Result<BuildConfig> {
        let package = self
            .package_settings
            .ok_or_else(|| Error::ConfigInvalid("metadata is required".into()))?;

        let missing = package.missing_fields();
        if !missing.is_empty() {
            return Err(Error::ConfigInvalid(format!(
                "missing or empty metadata field(s): {}",
                missing.join(", ")
            )));
        }

        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::ConfigInvalid("target identifiers must not be empty".into()));
        }

        // Two pipelines for one id would share and clobber one build directory
        if let Some(duplicate) = first_duplicate(&self.targets) {
            return Err(Error::ConfigInvalid(format!(
                "target '{duplicate}' is listed more than once"
            )));
        }

        Ok(BuildConfig::new(
            package,
            self.project_dir.unwrap_or_else(|| PathBuf::from(".")),
            self.source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            self.targets,
            self.icons,
        ))
    }
}

fn first_duplicate(targets: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .map(String::as_str)
        .find(|target| !seen.insert(*target))
}
