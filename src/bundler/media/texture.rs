//! Texture size limits for `tex3ds`.

use crate::bundler::error::{Bound, Error, Result, Side};
use image::ImageReader;
use std::path::Path;

/// Largest accepted width or height, in pixels.
pub const MAX_TEXTURE_SIZE: u32 = 1024;
/// Smallest accepted width or height, in pixels.
pub const MIN_TEXTURE_SIZE: u32 = 3;

/// Checks dimensions against the inclusive `[3, 1024]` range.
///
/// Oversized sides are reported before undersized ones, width before height.
pub fn check_texture_size(path: &Path, width: u32, height: u32) -> Result<()> {
    let violation = |side, bound, size, limit| Error::InvalidTexture {
        path: path.to_path_buf(),
        side,
        bound,
        size,
        limit,
    };

    if width > MAX_TEXTURE_SIZE {
        return Err(violation(Side::Width, Bound::TooLarge, width, MAX_TEXTURE_SIZE));
    }
    if height > MAX_TEXTURE_SIZE {
        return Err(violation(Side::Height, Bound::TooLarge, height, MAX_TEXTURE_SIZE));
    }
    if width < MIN_TEXTURE_SIZE {
        return Err(violation(Side::Width, Bound::TooSmall, width, MIN_TEXTURE_SIZE));
    }
    if height < MIN_TEXTURE_SIZE {
        return Err(violation(Side::Height, Bound::TooSmall, height, MIN_TEXTURE_SIZE));
    }
    Ok(())
}

/// Decodes the image at `path` and checks its size.
pub fn validate_texture(path: &Path) -> Result<()> {
    let undecodable = |reason: String| Error::UndecodableImage {
        path: path.to_path_buf(),
        reason,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| undecodable(e.to_string()))?
        .decode()
        .map_err(|e| undecodable(e.to_string()))?;

    check_texture_size(path, image.width(), image.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side_of(result: Result<()>) -> Option<(Side, Bound)> {
        match result {
            Err(Error::InvalidTexture { side, bound, .. }) => Some((side, bound)),
            _ => None,
        }
    }

    #[test]
    fn inclusive_bounds_pass() {
        let path = Path::new("sprite.png");
        for (w, h) in [(3, 3), (1024, 1024), (3, 1024), (512, 7)] {
            check_texture_size(path, w, h).unwrap();
        }
    }

    #[test]
    fn offending_side_is_reported() {
        let path = Path::new("sprite.png");
        assert_eq!(
            side_of(check_texture_size(path, 1025, 10)),
            Some((Side::Width, Bound::TooLarge))
        );
        assert_eq!(
            side_of(check_texture_size(path, 10, 1025)),
            Some((Side::Height, Bound::TooLarge))
        );
        assert_eq!(
            side_of(check_texture_size(path, 2, 2)),
            Some((Side::Width, Bound::TooSmall))
        );
        assert_eq!(
            side_of(check_texture_size(path, 64, 2)),
            Some((Side::Height, Bound::TooSmall))
        );
    }

    #[test]
    fn decodes_real_images() {
        let tmp = tempfile::tempdir().unwrap();
        let ok = tmp.path().join("ok.png");
        image::RgbaImage::new(16, 8).save(&ok).unwrap();
        validate_texture(&ok).unwrap();

        let wide = tmp.path().join("wide.png");
        image::RgbaImage::new(1025, 10).save(&wide).unwrap();
        assert_eq!(side_of(validate_texture(&wide)), Some((Side::Width, Bound::TooLarge)));

        let tiny = tmp.path().join("tiny.png");
        image::RgbaImage::new(2, 2).save(&tiny).unwrap();
        assert_eq!(side_of(validate_texture(&tiny)), Some((Side::Width, Bound::TooSmall)));

        let junk = tmp.path().join("junk.png");
        std::fs::write(&junk, b"nope").unwrap();
        assert!(matches!(validate_texture(&junk), Err(Error::UndecodableImage { .. })));
    }

    #[test]
    fn truncated_pixel_data_is_undecodable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cut.png");
        image::RgbaImage::new(16, 16).save(&path).unwrap();

        // Header is intact, so the size alone would pass.
        let bytes = std::fs::read(&path).unwrap();
        let idat = bytes.windows(4).position(|w| w == b"IDAT").unwrap();
        std::fs::write(&path, &bytes[..idat + 4 + 8]).unwrap();

        assert!(matches!(
            validate_texture(&path),
            Err(Error::UndecodableImage { .. })
        ));
    }
}
