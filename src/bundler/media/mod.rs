//! Media conversion for console runtimes.
//!
//! LÖVE Potion cannot load PNG/JPEG textures or TTF/OTF fonts directly; they
//! are converted to `.t3x` (via `tex3ds`) and `.bcfnt` (via `mkbcfnt`) next
//! to the source file. Conversions are independent, run concurrently, and are
//! joined before a batch returns.
//!
//! Failed conversions never fail a batch. They are logged and collected in
//! the [`ConversionReport`] so callers can decide how strict to be.

mod font;
mod icon;
mod texture;

pub use font::{validate_font, validate_font_bytes};
pub use icon::validate_icon;
pub use texture::{MAX_TEXTURE_SIZE, MIN_TEXTURE_SIZE, check_texture_size, validate_texture};

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    tool::{BuildStep, ToolRunner, Toolchain},
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{sync::Semaphore, task::JoinSet};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

const TEXTURE_TOOL: &str = "tex3ds";
const FONT_TOOL: &str = "mkbcfnt";

/// Convertible media categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Font,
}

impl MediaKind {
    /// Classifies by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if FONT_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Font)
        } else {
            None
        }
    }

    pub fn converted_extension(self) -> &'static str {
        match self {
            MediaKind::Image => "t3x",
            MediaKind::Font => "bcfnt",
        }
    }

    /// Name of the external converter.
    pub fn converter(self) -> &'static str {
        match self {
            MediaKind::Image => TEXTURE_TOOL,
            MediaKind::Font => FONT_TOOL,
        }
    }
}

/// `sprites/hero.png` → `sprites/hero.t3x`
pub fn converted_path(source: &Path, kind: MediaKind) -> PathBuf {
    source.with_extension(kind.converted_extension())
}

/// Converter invocation for one source file.
///
/// - image: `tex3ds -f rgba8888 -z auto <src> -o <dst>.t3x`
/// - font: `mkbcfnt <src> -o <dst>.bcfnt`
pub fn conversion_step(toolchain: &Toolchain, source: &Path, kind: MediaKind) -> BuildStep {
    let output = converted_path(source, kind);
    let step = BuildStep::new(toolchain.program(kind.converter()), output.clone());

    let step = match kind {
        MediaKind::Image => step.arg("-f").arg("rgba8888").arg("-z").arg("auto"),
        MediaKind::Font => step,
    };

    step.path_arg(source).arg("-o").path_arg(&output)
}

/// Validates a media file before conversion.
pub fn validate_media(path: &Path, kind: MediaKind) -> Result<()> {
    match kind {
        MediaKind::Image => validate_texture(path),
        MediaKind::Font => validate_font(path),
    }
}

/// What happened to each file of a conversion batch.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Converted output files.
    pub converted: Vec<PathBuf>,
    /// Source files whose validation or conversion failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Files not attempted (missing, empty, unsupported), with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Source files removed after the batch.
    pub deleted: Vec<PathBuf>,
}

impl ConversionReport {
    /// True when no attempted conversion failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `tex3ds`/`mkbcfnt` over batches of media files.
pub struct MediaConverter<R> {
    runner: Arc<R>,
    toolchain: Toolchain,
    concurrency: usize,
}

impl<R: ToolRunner> MediaConverter<R> {
    /// Converter allowing one running conversion per CPU.
    pub fn new(runner: Arc<R>, toolchain: Toolchain) -> Self {
        Self {
            runner,
            toolchain,
            concurrency: num_cpus::get().max(1),
        }
    }

    /// Converts every image and font under `dir`, writing the results next
    /// to their sources.
    ///
    /// With `delete_originals`, every discovered source file is deleted once
    /// the whole batch has finished, whether or not its own conversion
    /// succeeded. Unconverted media would otherwise end up in the game
    /// archive in a format the console cannot load.
    pub async fn convert_in_place(
        &self,
        dir: &Path,
        delete_originals: bool,
    ) -> Result<ConversionReport> {
        let files = collect_media(dir).await?;
        let mut report = self.convert_files(&files).await;

        if delete_originals {
            for file in &files {
                match tokio::fs::remove_file(file).await {
                    Ok(()) => report.deleted.push(file.clone()),
                    Err(e) => log::warn!("Failed to delete {}: {}", file.display(), e),
                }
            }
        }

        Ok(report)
    }

    /// Converts an explicit list of files.
    ///
    /// Missing, empty and unsupported files are skipped with a message.
    pub async fn convert_files(&self, files: &[PathBuf]) -> ConversionReport {
        let mut report = ConversionReport::default();

        if files.is_empty() {
            log::info!("No files to convert.");
            return report;
        }

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut sources = HashMap::new();

        for file in files {
            let kind = match precheck(file).await {
                Ok(kind) => kind,
                Err(e) => {
                    log::warn!("{e}");
                    report.skipped.push((file.clone(), e.to_string()));
                    continue;
                }
            };

            let runner = Arc::clone(&self.runner);
            let permits = Arc::clone(&permits);
            let step = conversion_step(&self.toolchain, file, kind);
            let source = file.clone();

            let task = tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                convert_one(runner.as_ref(), &source, kind, &step).await
            });
            sources.insert(task.id(), file.clone());
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(output))) => report.converted.push(output),
                Ok((id, Err(e))) => {
                    log::warn!("{e}");
                    report.failed.push((sources.remove(&id).unwrap_or_default(), e.to_string()));
                }
                Err(e) => {
                    let source = sources.remove(&e.id()).unwrap_or_default();
                    log::error!("Conversion task for {} failed: {e}", source.display());
                    report.failed.push((source, e.to_string()));
                }
            }
        }

        if !report.is_success() {
            log::warn!(
                "{} of {} media file(s) failed to convert",
                report.failed.len(),
                report.failed.len() + report.converted.len()
            );
        }

        report
    }
}

async fn precheck(file: &Path) -> Result<MediaKind> {
    let metadata = tokio::fs::metadata(file)
        .await
        .fs_context("reading media file", file)?;

    // Empty files and directories cannot be converted any more than a script can
    if !metadata.is_file() || metadata.len() == 0 {
        return Err(Error::UnsupportedMedia(file.to_path_buf()));
    }

    MediaKind::from_path(file).ok_or_else(|| Error::UnsupportedMedia(file.to_path_buf()))
}

async fn convert_one<R: ToolRunner>(
    runner: &R,
    source: &Path,
    kind: MediaKind,
    step: &BuildStep,
) -> Result<PathBuf> {
    let path = source.to_path_buf();
    tokio::task::spawn_blocking(move || validate_media(&path, kind))
        .await
        .map_err(|e| Error::GenericError(format!("Validation task panicked: {e}")))??;

    let name = source.file_name().unwrap_or_default().to_string_lossy();
    let converted = step.output.file_name().unwrap_or_default().to_string_lossy();
    log::info!("Converting {name} to {converted}..");

    runner.run(step).await?;

    log::info!("Converted {name} to {converted} successfully.");
    Ok(step.output.clone())
}

/// All convertible media files under `dir`, in walk order.
async fn collect_media(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && MediaKind::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Media scan task panicked: {e}")))?
}
