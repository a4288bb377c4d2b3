//! JSON summary of a bundling run.

use super::TargetOutcome;
use crate::bundler::{
    error::{ErrorExt, Result},
    settings::BuildConfig,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Everything a CI job needs to know about one run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub title: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<TargetOutcome>,
}

impl BuildReport {
    pub fn new(
        config: &BuildConfig,
        started_at: DateTime<Utc>,
        outcomes: Vec<TargetOutcome>,
    ) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            title: config.title().to_string(),
            version: config.version().to_string(),
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Writes the report as pretty-printed JSON.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating report directory", parent)?;
        }
        tokio::fs::write(path, json)
            .await
            .fs_context("writing build report", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Error, PackageSettings, settings::BuildConfigBuilder};
    use std::path::PathBuf;

    #[tokio::test]
    async fn counts_and_writes_outcomes() {
        let config = BuildConfigBuilder::new()
            .package_settings(PackageSettings {
                title: "Game".into(),
                author: "Me".into(),
                description: "Desc".into(),
                version: "2.0".into(),
            })
            .targets(["ctr", "psp"])
            .build()
            .unwrap();
        let outcomes = vec![
            TargetOutcome::success("ctr", PathBuf::from("ctr/Game.3dsx"), "00".into()),
            TargetOutcome::failure("psp", &Error::UnknownTarget("psp".into())),
        ];

        let report = BuildReport::new(&config, Utc::now(), outcomes);
        assert_eq!((report.succeeded, report.failed), (1, 1));
        assert!(!report.all_succeeded());

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reports/build.json");
        report.write(&path).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["title"], "Game");
        assert_eq!(json["outcomes"][1]["kind"], "unknown_target");
    }
}
