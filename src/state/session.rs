use iced::widget::image::Handle;
use image::DynamicImage;
use log::debug;
use std::path::Path;
use std::sync::Arc;

use super::data::ImageInfo;
use super::edit::{CropRect, Dimensions, Transform};
use crate::error::Result;
use crate::imaging::{self, loader::LoadedImage};

/// The image currently open in the viewer, plus its unsaved edits.
///
/// The decoded original is never modified. Every edit re-renders
/// `rendered` from it, so rotating back and forth is lossless.
#[derive(Debug)]
pub struct Session {
    info: ImageInfo,
    original: Arc<DynamicImage>,
    transform: Transform,
    rendered: Arc<DynamicImage>,
    handle: Handle,
}

impl Session {
    pub fn new(loaded: LoadedImage) -> Self {
        let handle = imaging::preview::to_handle(&loaded.image);
        Self {
            info: loaded.info,
            rendered: loaded.image.clone(),
            original: loaded.image,
            transform: Transform::new(),
            handle,
        }
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn path(&self) -> &Path {
        &self.info.path
    }

    /// The edited image, ready for display or saving
    pub fn rendered(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.rendered)
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Size of the image as currently displayed
    pub fn display_dimensions(&self) -> Dimensions {
        self.transform.output_dimensions(self.source_dimensions())
    }

    pub fn is_edited(&self) -> bool {
        !self.transform.is_identity()
    }

    pub fn rotate_left(&mut self) {
        let source = self.source_dimensions();
        self.transform.rotate_counter_clockwise(source);
        self.refresh();
    }

    pub fn rotate_right(&mut self) {
        let source = self.source_dimensions();
        self.transform.rotate_clockwise(source);
        self.refresh();
    }

    /// Crop to `rect`, given in the coordinates of the displayed image
    pub fn crop(&mut self, rect: CropRect) -> Result<()> {
        let source = self.source_dimensions();
        self.transform.crop(rect, source)?;
        self.refresh();
        Ok(())
    }

    /// Throw away all edits
    pub fn reset(&mut self) {
        if self.is_edited() {
            self.transform.reset();
            self.refresh();
        }
    }

    /// File name offered in the save dialog: "photo.jpg" -> "photo-edited.jpg"
    pub fn suggested_save_name(&self) -> String {
        let path = self.path();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        match path.extension() {
            Some(ext) => format!("{}-edited.{}", stem, ext.to_string_lossy()),
            None => format!("{}-edited.png", stem),
        }
    }

    fn source_dimensions(&self) -> Dimensions {
        (self.original.width(), self.original.height())
    }

    fn refresh(&mut self) {
        let rendered = if self.transform.is_identity() {
            Arc::clone(&self.original)
        } else {
            Arc::new(imaging::transform::apply(&self.original, &self.transform))
        };

        debug!(
            "Rendered {} at {}x{} (rotation {}°, crop {:?})",
            self.info.filename,
            rendered.width(),
            rendered.height(),
            self.transform.rotation.degrees(),
            self.transform.crop,
        );

        self.handle = imaging::preview::to_handle(&rendered);
        self.rendered = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn session(width: u32, height: u32) -> Session {
        let image = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let info = ImageInfo {
            filename: "photo.jpg".into(),
            path: PathBuf::from("/pictures/photo.jpg"),
            width,
            height,
            file_size: 0,
            modified: None,
            format: Some("Jpeg".into()),
        };
        Session::new(LoadedImage {
            info,
            image: Arc::new(DynamicImage::ImageRgba8(image)),
        })
    }

    #[test]
    fn test_rotate_right_swaps_dimensions() {
        let mut session = session(8, 4);
        session.rotate_right();
        assert_eq!(session.display_dimensions(), (4, 8));
        assert_eq!(session.rendered().width(), 4);
        assert!(session.is_edited());
    }

    #[test]
    fn test_four_rotations_restore_pixels() {
        let mut session = session(5, 3);
        let before = session.rendered().to_rgba8();
        for _ in 0..4 {
            session.rotate_left();
        }
        assert!(!session.is_edited());
        assert_eq!(session.rendered().to_rgba8(), before);
    }

    #[test]
    fn test_crop_then_reset() {
        let mut session = session(10, 10);
        session.crop(CropRect::new(2, 3, 4, 5)).unwrap();

        let rendered = session.rendered();
        assert_eq!((rendered.width(), rendered.height()), (4, 5));
        assert_eq!(rendered.to_rgba8().get_pixel(0, 0), &Rgba([2, 3, 0, 255]));

        session.reset();
        assert_eq!(session.display_dimensions(), (10, 10));
        assert!(!session.is_edited());
    }

    #[test]
    fn test_invalid_crop_leaves_image_untouched() {
        let mut session = session(10, 10);
        assert!(session.crop(CropRect::new(20, 20, 5, 5)).is_err());
        assert!(!session.is_edited());
    }

    #[test]
    fn test_suggested_save_name() {
        let session = session(2, 2);
        assert_eq!(session.suggested_save_name(), "photo-edited.jpg");
    }
}
