//! Game metadata shown by the console's home menu.

/// Game metadata from the `[metadata]` table of `lovebrew.toml`.
///
/// # Examples
///
/// ```no_run
/// use lovebrew_bundler::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     title: "SuperGame".into(),
///     author: "SuperAuthor".into(),
///     description: "SuperDescription".into(),
///     version: "0.1.0".into(),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    /// Game title. Also the base name of every output file.
    pub title: String,

    pub author: String,

    /// Short description. The 3DS home menu shows it next to the version.
    pub description: String,

    /// Free-form version string, e.g. "1.0.0".
    pub version: String,
}

impl PackageSettings {
    /// Names of required fields that are empty or whitespace.
    pub(crate) fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("description", &self.description),
            ("version", &self.version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
