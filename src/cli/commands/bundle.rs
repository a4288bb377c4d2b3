//! `lovebrew bundle`: build every configured target.

use crate::bundler::{
    BuildReport, BundleOptions, Bundler, PlatformRegistry, TargetOutcome, Toolchain,
};
use crate::cli::{RuntimeConfig, args::BundleArgs};
use crate::error::Result;
use crate::metadata;
use chrono::Utc;

/// Runs the bundler for the project in `args.project_dir`.
///
/// Returns exit code 0 only if every requested target produced an artifact.
/// Configuration errors (missing manifest, no targets) are returned as
/// errors before anything is built.
pub async fn bundle(args: &BundleArgs, runtime_config: &RuntimeConfig) -> Result<i32> {
    let output = runtime_config.output();

    let config = metadata::load_manifest(&args.project_dir)?;
    output.verbose(&format!(
        "Loaded {} from {}",
        metadata::MANIFEST_FILE,
        args.project_dir.display()
    ))?;

    let registry = match &args.resources_dir {
        Some(dir) => PlatformRegistry::new(dir),
        None => PlatformRegistry::from_env()?,
    };
    output.verbose(&format!("Resources: {}", registry.root().display()))?;

    let options = BundleOptions {
        output_dir: args.output.clone(),
        toolchain: args
            .tools_dir
            .as_ref()
            .map(Toolchain::in_dir)
            .unwrap_or_default(),
        tool_timeout: args.tool_timeout(),
        parallel: args.parallel,
        merge_assets: !args.no_merge,
        keep_intermediates: args.keep_intermediates,
        strict_media: args.strict_media,
    };

    output.section(&format!(
        "Bundling {} {} by {}",
        config.title(),
        config.version(),
        config.author()
    ))?;

    let started_at = Utc::now();
    let bundler = Bundler::new(config, registry, options);
    let outcomes = bundler.build().await?;

    print_summary(runtime_config, &outcomes)?;

    let report = BuildReport::new(bundler.config(), started_at, outcomes);
    if let Some(path) = &args.report {
        report.write(path).await?;
        output.verbose(&format!("Wrote build report to {}", path.display()))?;
    }

    if report.all_succeeded() {
        output.success(&format!("Built {} target(s)", report.succeeded))?;
        Ok(0)
    } else {
        output.error(&format!(
            "{} of {} target(s) failed",
            report.failed,
            report.outcomes.len()
        ))?;
        Ok(1)
    }
}

fn print_summary(runtime_config: &RuntimeConfig, outcomes: &[TargetOutcome]) -> Result<()> {
    let output = runtime_config.output();
    output.section("Summary")?;

    for outcome in outcomes {
        if outcome.success {
            output.success(&outcome.to_string())?;
            if let Some(checksum) = &outcome.checksum {
                output.indent(&format!("sha256 {checksum}"))?;
            }
        } else {
            let stage = outcome
                .failed_stage
                .map(|stage| format!(" while {stage}"))
                .unwrap_or_default();
            output.error(&format!("{}{stage}", outcome))?;
        }
    }

    Ok(())
}
