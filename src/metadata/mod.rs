//! Project configuration discovery from `lovebrew.toml`.

use crate::bundler::{BuildConfig, BuildConfigBuilder, Error, PackageSettings, Result};
use std::path::Path;

/// Name of the project configuration file.
pub const MANIFEST_FILE: &str = "lovebrew.toml";

/// Load the build configuration of the project in `project_dir`.
///
/// Reads `<project_dir>/lovebrew.toml` once, then extracts:
/// - `[metadata]`: `title`, `author`, `description`, `version` (all required)
/// - `[build]`: `targets` (list of identifiers), `source` (optional)
/// - `[icons]`: optional custom icon per target identifier
///
/// # Errors
///
/// [`Error::ConfigInvalid`] if the file is missing, is not valid TOML, or a
/// required field is missing, empty or of the wrong type.
pub fn load_manifest(project_dir: &Path) -> Result<BuildConfig> {
    let manifest_path = project_dir.join(MANIFEST_FILE);

    let manifest = std::fs::read_to_string(&manifest_path).map_err(|e| {
        Error::ConfigInvalid(format!("failed to read {}: {}", manifest_path.display(), e))
    })?;

    parse_manifest(project_dir, &manifest)
}

/// Parse manifest text; relative paths resolve against `project_dir`.
pub fn parse_manifest(project_dir: &Path, manifest: &str) -> Result<BuildConfig> {
    let toml_value: toml::Value = toml::from_str(manifest)
        .map_err(|e| Error::ConfigInvalid(format!("failed to parse {MANIFEST_FILE}: {e}")))?;

    let metadata = toml_value
        .get("metadata")
        .ok_or_else(|| Error::ConfigInvalid("no [metadata] section".into()))?;

    let package = PackageSettings {
        title: string_field(metadata, "metadata", "title")?,
        author: string_field(metadata, "metadata", "author")?,
        description: string_field(metadata, "metadata", "description")?,
        version: string_field(metadata, "metadata", "version")?,
    };

    let mut builder = BuildConfigBuilder::new()
        .project_dir(project_dir)
        .package_settings(package);

    if let Some(build) = toml_value.get("build") {
        if let Some(targets) = build.get("targets") {
            let targets = targets
                .as_array()
                .ok_or_else(|| Error::ConfigInvalid("[build] targets must be a list".into()))?
                .iter()
                .map(|v| {
                    v.as_str().map(String::from).ok_or_else(|| {
                        Error::ConfigInvalid("[build] targets must be strings".into())
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            builder = builder.targets(targets);
        }

        if build.get("source").is_some() {
            builder = builder.source(string_field(build, "build", "source")?);
        }
    }

    if let Some(icons) = toml_value.get("icons") {
        let table = icons
            .as_table()
            .ok_or_else(|| Error::ConfigInvalid("[icons] must be a table".into()))?;
        for (target, path) in table {
            let path = path.as_str().ok_or_else(|| {
                Error::ConfigInvalid(format!("[icons] {target} must be a path string"))
            })?;
            builder = builder.icon(target.as_str(), path);
        }
    }

    builder.build()
}

fn string_field(table: &toml::Value, section: &str, key: &str) -> Result<String> {
    match table.get(key) {
        None => Err(Error::ConfigInvalid(format!("missing '{key}' in [{section}]"))),
        Some(value) => value
            .as_str()
            .map(String::from)
            .ok_or_else(|| Error::ConfigInvalid(format!("'{key}' in [{section}] must be a string"))),
    }
}
