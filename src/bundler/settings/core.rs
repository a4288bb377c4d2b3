//! Core BuildConfig struct and implementations.

use super::PackageSettings;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Asset directory used when `build.source` is not set.
pub const DEFAULT_SOURCE_DIR: &str = "game";

/// Immutable project configuration, constructed via [`BuildConfigBuilder`].
///
/// # Examples
///
/// ```no_run
/// use lovebrew_bundler::bundler::{BuildConfigBuilder, PackageSettings};
///
/// # fn example() -> lovebrew_bundler::bundler::Result<()> {
/// let config = BuildConfigBuilder::new()
///     .project_dir("my-game")
///     .package_settings(PackageSettings {
///         title: "SuperGame".into(),
///         author: "SuperAuthor".into(),
///         description: "SuperDescription".into(),
///         version: "0.1.0".into(),
///     })
///     .targets(["ctr", "hac"])
///     .icon("ctr", "icon48.png")
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// [`BuildConfigBuilder`]: super::BuildConfigBuilder
#[derive(Clone, Debug)]
pub struct BuildConfig {
    package: PackageSettings,

    /// Directory containing `lovebrew.toml`. Relative paths resolve against it.
    project_dir: PathBuf,

    /// Asset directory, relative to `project_dir`.
    source: PathBuf,

    /// Target identifiers in the order they were requested. Unknown
    /// identifiers are kept so the orchestrator can report them.
    targets: Vec<String>,

    /// Custom icon per target identifier, relative to `project_dir`.
    icons: HashMap<String, PathBuf>,
}

impl BuildConfig {
    pub fn title(&self) -> &str {
        &self.package.title
    }

    pub fn author(&self) -> &str {
        &self.package.author
    }

    pub fn description(&self) -> &str {
        &self.package.description
    }

    pub fn version(&self) -> &str {
        &self.package.version
    }

    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Absolute-or-project-relative path of the asset directory.
    pub fn source_dir(&self) -> PathBuf {
        self.project_dir.join(&self.source)
    }

    /// Asset directory as configured (relative to the project).
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Custom icon for `target`, resolved against the project directory.
    pub fn icon_for(&self, target: &str) -> Option<PathBuf> {
        self.icons.get(target).map(|icon| self.project_dir.join(icon))
    }

    pub(super) fn new(
        package: PackageSettings,
        project_dir: PathBuf,
        source: PathBuf,
        targets: Vec<String>,
        icons: HashMap<String, PathBuf>,
    ) -> Self {
        Self {
            package,
            project_dir,
            source,
            targets,
            icons,
        }
    }
}
