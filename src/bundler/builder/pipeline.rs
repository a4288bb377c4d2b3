//! Per-target packaging pipeline.
//!
//! ```text
//! ValidatingIcon → PackagingMetadata → PackagingExecutable → MergingAssets → Done
//! ```
//!
//! Any error ends the pipeline in the state it happened in. The pipeline
//! never returns an error; everything is folded into a [`TargetOutcome`].

use super::{
    BundleOptions,
    checksum::calculate_sha256,
    outcome::{Stage, TargetOutcome},
};
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    media::{MediaConverter, validate_icon},
    platform::PlatformDescriptor,
    settings::{BuildConfig, DEFAULT_SOURCE_DIR},
    tool::{BuildStep, ToolRunner},
    utils::{archive, fs},
};
use path_absolutize::Absolutize;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Packaging chain for one target, writing into its own build directory.
pub struct TargetPipeline<R> {
    descriptor: PlatformDescriptor,
    config: Arc<BuildConfig>,
    runner: Arc<R>,
    options: BundleOptions,
    build_dir: PathBuf,
}

impl<R: ToolRunner> TargetPipeline<R> {
    pub fn new(
        descriptor: PlatformDescriptor,
        config: Arc<BuildConfig>,
        runner: Arc<R>,
        options: BundleOptions,
        build_dir: PathBuf,
    ) -> Self {
        Self {
            descriptor,
            config,
            runner,
            options,
            build_dir,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Runs every stage in order and reports how far it got.
    pub async fn run(self) -> TargetOutcome {
        let target = self.descriptor.target;
        let mut stage = Stage::ValidatingIcon;
        let mut icon = PathBuf::new();

        loop {
            log::info!("[{target}] {stage}");

            let next = match stage {
                Stage::ValidatingIcon => self.resolve_icon().await.map(|resolved| {
                    icon = resolved;
                    Stage::PackagingMetadata
                }),
                Stage::PackagingMetadata => {
                    let step = self.descriptor.metadata_step(
                        &self.config,
                        &self.options.toolchain,
                        &self.build_dir,
                        &icon,
                    );
                    self.run_step(&step)
                        .await
                        .map(|()| Stage::PackagingExecutable)
                }
                Stage::PackagingExecutable => {
                    let step = self.descriptor.executable_step(
                        &self.config,
                        &self.options.toolchain,
                        &self.build_dir,
                        &icon,
                    );
                    self.run_step(&step).await.map(|()| {
                        if self.options.merge_assets {
                            Stage::MergingAssets
                        } else {
                            Stage::Done
                        }
                    })
                }
                Stage::MergingAssets => self.merge_assets().await.map(|()| Stage::Done),
                Stage::Done => {
                    let artifact = self.executable_path();
                    return match calculate_sha256(&artifact).await {
                        Ok(checksum) => {
                            log::info!("Successfully compiled {target}");
                            TargetOutcome::success(target.id(), artifact, checksum)
                        }
                        Err(e) => self.fail(stage, &e),
                    };
                }
            };

            match next {
                Ok(next) => stage = next,
                Err(e) => return self.fail(stage, &e),
            }
        }
    }

    /// Runs a tool step against a clean slate, so only a file the tool
    /// writes in this run can satisfy the step.
    async fn run_step(&self, step: &BuildStep) -> Result<()> {
        fs::remove_file(&step.output).await?;
        self.runner.run(step).await
    }

    fn fail(&self, stage: Stage, error: &Error) -> TargetOutcome {
        log::error!("Failed to compile {} ({stage}): {error}", self.descriptor.target);
        TargetOutcome::failed_at(self.descriptor.target.id(), stage, error)
    }

    fn executable_path(&self) -> PathBuf {
        self.descriptor
            .executable_path(&self.build_dir, self.config.title())
    }

    /// Custom icon if configured and valid, the platform default otherwise.
    ///
    /// An invalid custom icon fails the target; it never falls back to the
    /// default icon.
    async fn resolve_icon(&self) -> Result<PathBuf> {
        let target = self.descriptor.target;

        let icon = match self.config.icon_for(target.id()) {
            Some(custom) => {
                let path = custom.clone();
                tokio::task::spawn_blocking(move || validate_icon(&path, target))
                    .await
                    .map_err(|e| Error::GenericError(format!("Icon validation panicked: {e}")))??;
                custom
            }
            None => self.descriptor.default_icon.clone(),
        };

        Ok(icon
            .absolutize()
            .fs_context("resolving icon path", &icon)?
            .into_owned())
    }

    /// Stages, converts, zips and appends the game assets to the executable.
    async fn merge_assets(&self) -> Result<()> {
        let title = self.config.title();
        let staged = self.build_dir.join(
            self.config
                .source()
                .file_name()
                .unwrap_or(OsStr::new(DEFAULT_SOURCE_DIR)),
        );
        let bundle = self.build_dir.join(format!("{title}-bundle.zip"));
        let executable = self.executable_path();

        log::info!(
            "Copying assets from {} to {}",
            self.config.source_dir().display(),
            staged.display()
        );
        fs::copy_dir(&self.config.source_dir(), &staged).await?;

        let converter =
            MediaConverter::new(Arc::clone(&self.runner), self.options.toolchain.clone());
        let report = converter.convert_in_place(&staged, true).await?;

        if self.options.strict_media
            && let Some((file, reason)) = report.failed.first()
        {
            crate::bail!(
                "{} media file(s) failed to convert, first: {} ({reason})",
                report.failed.len(),
                file.display()
            );
        }

        archive::zip_directory(&staged, &bundle).await?;
        archive::merge_files(&executable, &bundle, &executable).await?;

        if !self.options.keep_intermediates {
            fs::remove_file(&bundle).await?;
            fs::remove_dir_all(&staged).await?;
        }

        Ok(())
    }
}
