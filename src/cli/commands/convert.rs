//! `lovebrew convert`: convert media outside of a bundle run.

use crate::bundler::{
    ConversionReport, MediaConverter, ProcessRunner, Toolchain,
    media::{MediaKind, converted_path},
};
use crate::cli::{RuntimeConfig, args::ConvertArgs};
use crate::error::Result;
use std::{path::PathBuf, sync::Arc};

/// Converts the given files, and every media file inside given directories.
///
/// Directories are converted in place. With `--delete`, their media files are
/// removed after the batch regardless of the conversion result, while
/// explicitly listed files are only removed once converted.
///
/// Returns exit code 0 if no conversion failed.
pub async fn convert(args: &ConvertArgs, runtime_config: &RuntimeConfig) -> Result<i32> {
    let output = runtime_config.output();
    let toolchain = args
        .tools_dir
        .as_ref()
        .map(Toolchain::in_dir)
        .unwrap_or_default();
    let converter = MediaConverter::new(
        Arc::new(ProcessRunner::new(args.tool_timeout())),
        toolchain,
    );

    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
        args.paths.iter().cloned().partition(|path| path.is_dir());

    let mut total = ConversionReport::default();

    for dir in &dirs {
        output.progress(&format!("Converting media in {}", dir.display()))?;
        let report = converter.convert_in_place(dir, args.delete).await?;
        absorb(&mut total, report);
    }

    if !files.is_empty() {
        let report = converter.convert_files(&files).await;
        if args.delete {
            for file in &files {
                let converted = MediaKind::from_path(file)
                    .map(|kind| report.converted.contains(&converted_path(file, kind)))
                    .unwrap_or(false);
                if converted {
                    tokio::fs::remove_file(file).await?;
                    total.deleted.push(file.clone());
                }
            }
        }
        absorb(&mut total, report);
    }

    for (file, reason) in &total.skipped {
        output.warn(&format!("skipped {}: {reason}", file.display()))?;
    }
    for (file, reason) in &total.failed {
        output.error(&format!("{}: {reason}", file.display()))?;
    }
    for file in &total.converted {
        output.verbose(&format!("converted {}", file.display()))?;
    }

    if total.is_success() {
        output.success(&format!("Converted {} file(s)", total.converted.len()))?;
        Ok(0)
    } else {
        output.error(&format!(
            "{} file(s) failed to convert",
            total.failed.len()
        ))?;
        Ok(1)
    }
}

fn absorb(total: &mut ConversionReport, report: ConversionReport) {
    total.converted.extend(report.converted);
    total.failed.extend(report.failed);
    total.skipped.extend(report.skipped);
    total.deleted.extend(report.deleted);
}
