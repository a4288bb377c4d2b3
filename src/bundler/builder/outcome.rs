//! Per-target build results.

use crate::bundler::error::{Error, FailureKind};
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Pipeline states, in execution order.
///
/// A failure in any state ends the pipeline; the failing state is recorded
/// in [`TargetOutcome::failed_stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ValidatingIcon,
    PackagingMetadata,
    PackagingExecutable,
    MergingAssets,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::ValidatingIcon => "validating icon",
            Stage::PackagingMetadata => "packaging metadata",
            Stage::PackagingExecutable => "packaging executable",
            Stage::MergingAssets => "merging assets",
            Stage::Done => "done",
        })
    }
}

/// Result of one target's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    /// Target identifier as requested in the configuration.
    pub target: String,
    pub success: bool,
    /// Human-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
    /// Final merged executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// SHA-256 of `artifact`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl TargetOutcome {
    pub fn success(target: impl Into<String>, artifact: PathBuf, checksum: String) -> Self {
        Self {
            target: target.into(),
            success: true,
            reason: None,
            kind: None,
            failed_stage: None,
            artifact: Some(artifact),
            checksum: Some(checksum),
        }
    }

    /// Failure not tied to a pipeline stage (unknown target, setup errors).
    pub fn failure(target: impl Into<String>, error: &Error) -> Self {
        Self {
            target: target.into(),
            success: false,
            reason: Some(error.to_string()),
            kind: Some(error.kind()),
            failed_stage: None,
            artifact: None,
            checksum: None,
        }
    }

    pub fn failed_at(target: impl Into<String>, stage: Stage, error: &Error) -> Self {
        Self {
            failed_stage: Some(stage),
            ..Self::failure(target, error)
        }
    }
}

impl fmt::Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.artifact, &self.reason) {
            (Some(artifact), _) if self.success => {
                write!(f, "{}: {}", self.target, artifact.display())
            }
            (_, Some(reason)) => write!(f, "{}: {}", self.target, reason),
            _ => write!(f, "{}: failed", self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_kind_and_stage() {
        let err = Error::OutputMissing {
            program: "smdhtool".into(),
            output: PathBuf::from("ctr/Game.smdh"),
        };
        let outcome = TargetOutcome::failed_at("ctr", Stage::PackagingMetadata, &err);

        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(FailureKind::OutputMissing));
        assert_eq!(outcome.failed_stage, Some(Stage::PackagingMetadata));
        assert_eq!(outcome.to_string(), "ctr: `smdhtool` did not create ctr/Game.smdh");
    }

    #[test]
    fn serializes_without_empty_fields() {
        let outcome = TargetOutcome::success("hac", PathBuf::from("hac/Game.nro"), "ab".into());
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "target": "hac",
                "success": true,
                "artifact": "hac/Game.nro",
                "checksum": "ab"
            })
        );
    }
}
