//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs one
//! [`TargetPipeline`] per configured console and collects the outcomes.

use super::{BundleOptions, TargetOutcome, pipeline::TargetPipeline};
use crate::bundler::{
    error::{Error, Result},
    media::MediaKind,
    platform::{PlatformRegistry, Target},
    settings::BuildConfig,
    tool::{ProcessRunner, ToolRunner, missing_tools},
    utils::fs,
};
use std::{path::PathBuf, sync::Arc};

/// Main bundler orchestrator.
///
/// Every configured target gets its own build directory and pipeline. A
/// failing target never stops the others; its error is recorded in its
/// [`TargetOutcome`] instead.
///
/// # Examples
///
/// ```no_run
/// use lovebrew_bundler::bundler::{BundleOptions, Bundler, PlatformRegistry};
///
/// # async fn example(config: lovebrew_bundler::bundler::BuildConfig) -> lovebrew_bundler::bundler::Result<()> {
/// let bundler = Bundler::new(config, PlatformRegistry::from_env()?, BundleOptions::default());
/// for outcome in bundler.build().await? {
///     println!("{outcome}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Bundler<R = ProcessRunner> {
    config: Arc<BuildConfig>,
    registry: Arc<PlatformRegistry>,
    runner: Arc<R>,
    options: BundleOptions,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("runner", &self.runner)
            .field("options", &self.options)
            .finish()
    }
}

impl Bundler<ProcessRunner> {
    /// Creates a bundler that runs the real devkitPro tools.
    pub fn new(config: BuildConfig, registry: PlatformRegistry, options: BundleOptions) -> Self {
        let runner = ProcessRunner::new(options.tool_timeout);
        Self::with_runner(config, registry, runner, options)
    }
}

impl<R: ToolRunner> Bundler<R> {
    /// Creates a bundler with a custom step runner.
    pub fn with_runner(
        config: BuildConfig,
        registry: PlatformRegistry,
        runner: R,
        options: BundleOptions,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            runner: Arc::new(runner),
            options,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Root under which `<target>/` build directories are created.
    pub fn output_dir(&self) -> PathBuf {
        self.options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.project_dir().to_path_buf())
    }

    /// Builds every configured target.
    ///
    /// # Returns
    ///
    /// One [`TargetOutcome`] per requested target, in request order. Unknown
    /// targets are skipped with a warning and reported as failed.
    ///
    /// # Errors
    ///
    /// [`Error::NoTargetsConfigured`] if the configuration lists no targets.
    /// Nothing is created on disk in that case.
    pub async fn build(&self) -> Result<Vec<TargetOutcome>> {
        let targets = self.config.targets();
        if targets.is_empty() {
            return Err(Error::NoTargetsConfigured);
        }

        self.preflight();

        if self.options.parallel {
            let handles: Vec<_> = targets
                .iter()
                .map(|id| (id.clone(), tokio::spawn(self.bundle_target(id))))
                .collect();

            let mut outcomes = Vec::with_capacity(handles.len());
            for (id, handle) in handles {
                outcomes.push(handle.await.unwrap_or_else(|e| {
                    TargetOutcome::failure(id, &Error::GenericError(format!("build task failed: {e}")))
                }));
            }
            Ok(outcomes)
        } else {
            let mut outcomes = Vec::with_capacity(targets.len());
            for id in targets {
                outcomes.push(self.bundle_target(id).await);
            }
            Ok(outcomes)
        }
    }

    /// Future building a single target, detached from `self`.
    fn bundle_target(&self, id: &str) -> impl Future<Output = TargetOutcome> + Send + use<R> {
        let id = id.to_string();
        let descriptor = self.registry.resolve(&id).cloned();
        let build_dir = self.output_dir().join(&id);
        let config = Arc::clone(&self.config);
        let runner = Arc::clone(&self.runner);
        let options = self.options.clone();

        async move {
            let descriptor = match descriptor {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    log::warn!("Invalid target {id}, skipping");
                    return TargetOutcome::failure(id, &e);
                }
            };

            log::info!(
                "Creating {} for {} in {}",
                config.title(),
                descriptor.target.console_name(),
                build_dir.display()
            );

            if let Err(e) = fs::create_dir_all(&build_dir, false).await {
                log::error!("Failed to compile {id}: {e}");
                return TargetOutcome::failure(id, &e);
            }

            TargetPipeline::new(descriptor, config, runner, options, build_dir)
                .run()
                .await
        }
    }

    /// Warns about external tools that are not installed.
    fn preflight(&self) {
        let toolchain = &self.options.toolchain;

        for id in self.config.targets() {
            let Ok(target) = id.parse::<Target>() else {
                continue;
            };
            for tool in missing_tools(toolchain, target.required_tools()) {
                log::warn!("{tool} not found; {target} packaging will fail");
            }
        }

        if self.options.merge_assets {
            let converters = [MediaKind::Image.converter(), MediaKind::Font.converter()];
            for tool in missing_tools(toolchain, &converters) {
                log::warn!("{tool} not found; game media will not be converted");
            }
        }
    }
}
