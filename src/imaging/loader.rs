//! Image file loader
//!
//! Decodes an image file with the `image` crate and collects the metadata
//! shown in the status bar. Decoding is CPU-bound, so it runs on the tokio
//! blocking pool and the UI thread only receives the finished result.

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageReader};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

use crate::error::{Error, Result};
use crate::state::data::ImageInfo;

/// A decoded image together with its file metadata
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub info: ImageInfo,
    pub image: Arc<DynamicImage>,
}

/// Load and decode an image file
///
/// # Arguments
/// * `path` - Path to the image file
///
/// # Returns
/// * `Ok(LoadedImage)` - Decoded pixels and metadata
/// * `Err(Error)` - The file is missing, unreadable or not an image
pub async fn load_image(path: PathBuf) -> Result<LoadedImage> {
    task::spawn_blocking(move || load_image_blocking(&path)).await?
}

/// Blocking implementation of image loading
pub fn load_image_blocking(path: &Path) -> Result<LoadedImage> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;

    // Trust the file contents over the extension
    let reader = ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?;
    let format = reader.format().map(|f| format!("{:?}", f));

    let image = reader.decode().map_err(|e| Error::decode(path, e))?;

    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    info!(
        "Loaded {}: {}x{} ({})",
        filename,
        image.width(),
        image.height(),
        format.as_deref().unwrap_or("unknown format")
    );

    let info = ImageInfo {
        filename,
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        file_size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
        format,
    };

    Ok(LoadedImage {
        info,
        image: Arc::new(image),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.png");
        RgbImage::from_pixel(7, 3, Rgb([10, 20, 30])).save(&path).unwrap();

        let loaded = load_image(path.clone()).await.unwrap();

        assert_eq!((loaded.info.width, loaded.info.height), (7, 3));
        assert_eq!(loaded.info.filename, "sample.png");
        assert_eq!(loaded.info.format.as_deref(), Some("Png"));
        assert!(loaded.info.file_size > 0);
        assert!(loaded.info.modified.is_some());
        assert_eq!(loaded.image.width(), 7);
    }

    #[test]
    fn test_format_is_guessed_from_contents() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("sample.png");
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])).save(&png).unwrap();
        let misnamed = dir.path().join("actually-png.jpg");
        fs::rename(&png, &misnamed).unwrap();

        let loaded = load_image_blocking(&misnamed).unwrap();
        assert_eq!(loaded.info.format.as_deref(), Some("Png"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_image(PathBuf::from("/nonexistent/path.png")).await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = load_image_blocking(&path);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
