use iced::widget::image::Handle;
use image::{DynamicImage, RgbaImage};
use log::debug;
use std::path::PathBuf;
use tokio::task;

use super::loader;
use crate::error::Result;

/// Thumbnails fit into a square of this many pixels
pub const THUMBNAIL_SIZE: u32 = 160;

/// Decode `path` and shrink it into a gallery thumbnail.
///
/// Thumbnails live in memory only; nothing is written to a cache directory.
pub async fn load_thumbnail(path: PathBuf) -> Result<Handle> {
    task::spawn_blocking(move || {
        let loaded = loader::load_image_blocking(&path)?;
        let thumbnail = make_thumbnail(&loaded.image);
        debug!(
            "Generated thumbnail for {} ({}x{})",
            path.display(),
            thumbnail.width(),
            thumbnail.height()
        );
        let (width, height) = thumbnail.dimensions();
        Ok(Handle::from_rgba(width, height, thumbnail.into_raw()))
    })
    .await?
}

/// Resize to fit `THUMBNAIL_SIZE`, keeping the aspect ratio.
/// Images that already fit are left at their size.
pub fn make_thumbnail(image: &DynamicImage) -> RgbaImage {
    if image.width() <= THUMBNAIL_SIZE && image.height() <= THUMBNAIL_SIZE {
        return image.to_rgba8();
    }
    image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_thumbnail_keeps_aspect_ratio() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(800, 400));
        let thumbnail = make_thumbnail(&image);
        assert_eq!(thumbnail.dimensions(), (160, 80));
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(40, 90));
        assert_eq!(make_thumbnail(&image).dimensions(), (40, 90));
    }

    #[tokio::test]
    async fn test_load_thumbnail_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tall.png");
        RgbImage::from_pixel(100, 400, Rgb([1, 2, 3])).save(&path).unwrap();

        assert!(load_thumbnail(path).await.is_ok());
        assert!(load_thumbnail(dir.path().join("missing.png")).await.is_err());
    }
}
