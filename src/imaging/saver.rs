use image::{DynamicImage, ImageFormat};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

use crate::error::{Error, Result};

/// Encode `image` to `path`, picking the format from the file extension.
///
/// Returns the path that was written so the caller can report it.
pub async fn save_image(image: Arc<DynamicImage>, path: PathBuf) -> Result<PathBuf> {
    task::spawn_blocking(move || {
        save_image_blocking(&image, &path)?;
        Ok(path)
    })
    .await?
}

pub fn save_image_blocking(image: &DynamicImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(|format| format.can_write())
        .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;

    let prepared = prepare_for_format(image, format);

    prepared
        .save_with_format(path, format)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => Error::io(path, io),
            other => Error::encode(path, other),
        })?;

    info!(
        "Saved {}x{} image to {}",
        prepared.width(),
        prepared.height(),
        path.display()
    );
    Ok(())
}

/// Convert pixel layouts the target encoder cannot take.
///
/// JPEG has no alpha channel and only 8-bit samples; the WebP encoder only
/// accepts 8-bit RGB(A).
fn prepare_for_format(image: &DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormat::WebP if image.color().has_alpha() => {
            DynamicImage::ImageRgba8(image.to_rgba8())
        }
        ImageFormat::WebP => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn translucent(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 128])))
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.jpg");

        save_image_blocking(&translucent(6, 4), &path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (6, 4));
        assert!(!reloaded.color().has_alpha());
    }

    #[test]
    fn test_png_keeps_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.png");

        save_image_blocking(&translucent(3, 5), &path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.to_rgba8().get_pixel(0, 0), &Rgba([200, 100, 50, 128]));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = save_image_blocking(&translucent(1, 1), &dir.path().join("out.xyz"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

        let result = save_image_blocking(&translucent(1, 1), &dir.path().join("no_extension"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let result = save_image(Arc::new(translucent(2, 2)), path).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
