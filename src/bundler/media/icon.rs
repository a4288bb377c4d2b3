//! Custom icon validation.

use crate::bundler::{
    error::{Error, Result},
    platform::Target,
};
use image::ImageReader;
use std::path::Path;

/// Checks that `path` is an icon `target` can use.
///
/// The file content is sniffed rather than trusted by extension, so a
/// mislabeled image still reports its real dimensions before the extension
/// check rejects it. The whole image is decoded; a readable header alone is
/// not enough.
///
/// # Errors
///
/// - [`Error::InvalidIconFormat`] if the file cannot be read as an image
/// - [`Error::InvalidIconDimensions`] if it is not the target's square size
/// - [`Error::InvalidIconType`] if its extension is not accepted
pub fn validate_icon(path: &Path, target: Target) -> Result<()> {
    log::info!("Validating icon for {}: {}", target, path.display());

    let format_error = |reason: String| Error::InvalidIconFormat {
        target: target.to_string(),
        reason,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| format_error(format!("{}: {e}", path.display())))?
        .decode()
        .map_err(|e| format_error(e.to_string()))?;
    let (width, height) = (image.width(), image.height());

    let expected = target.icon_dimension();
    if width != expected || height != expected {
        return Err(Error::InvalidIconDimensions {
            target: target.to_string(),
            expected,
            width,
            height,
        });
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !target.icon_extensions().contains(&extension.as_str()) {
        return Err(Error::InvalidIconType {
            target: target.to_string(),
            expected: target.icon_extensions().join(" or "),
            found: extension,
        });
    }

    log::info!("Using custom icon for {target}");
    Ok(())
}
