//! Transient edit parameters for the open image
//!
//! A `Transform` records what the user did to the current image (rotation and
//! crop). It is applied to the untouched original every time the view is
//! rendered or the image is saved, and thrown away when the user navigates to
//! another file.

use crate::error::{Error, Result};

/// Image dimensions as (width, height) in pixels
pub type Dimensions = (u32, u32);

/// Clockwise rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Cw90,
            Rotation::Cw90 => Rotation::Cw180,
            Rotation::Cw180 => Rotation::Cw270,
            Rotation::Cw270 => Rotation::None,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Cw270,
            Rotation::Cw90 => Rotation::None,
            Rotation::Cw180 => Rotation::Cw90,
            Rotation::Cw270 => Rotation::Cw180,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// Dimensions of an image of size `dims` after this rotation
    pub fn apply_to(self, (width, height): Dimensions) -> Dimensions {
        match self {
            Rotation::None | Rotation::Cw180 => (width, height),
            Rotation::Cw90 | Rotation::Cw270 => (height, width),
        }
    }
}

/// Rectangle in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Square selection of `side` pixels centered in `frame`, shrunk to fit
    pub fn centered(side: u32, (width, height): Dimensions) -> Self {
        let side = side.min(width).min(height).max(1);
        Self {
            x: (width.saturating_sub(side)) / 2,
            y: (height.saturating_sub(side)) / 2,
            width: side.min(width),
            height: side.min(height),
        }
    }

    /// Intersect with a `width` x `height` frame.
    /// Returns `None` when nothing of the rectangle is left.
    pub fn clamp_to(self, (width, height): Dimensions) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self::new(self.x, self.y, w, h))
    }

    /// Map this rectangle through a 90° clockwise turn of a `frame`-sized image
    pub fn rotate_clockwise(self, (_, frame_height): Dimensions) -> Self {
        Self {
            x: frame_height.saturating_sub(self.y + self.height),
            y: self.x,
            width: self.height,
            height: self.width,
        }
    }

    /// Map this rectangle through a 90° counter-clockwise turn of a `frame`-sized image
    pub fn rotate_counter_clockwise(self, (frame_width, _): Dimensions) -> Self {
        Self {
            x: self.y,
            y: frame_width.saturating_sub(self.x + self.width),
            width: self.height,
            height: self.width,
        }
    }

    /// Translate a rectangle relative to `origin` into the coordinates `origin` lives in
    pub fn offset_by(self, origin: &CropRect) -> Self {
        Self {
            x: origin.x + self.x,
            y: origin.y + self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        (self.width, self.height)
    }
}

/// All edits applied to the open image
///
/// The crop is stored in the coordinates of the rotated (uncropped) source,
/// so `apply` is always "rotate, then crop".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    pub rotation: Rotation,
    pub crop: Option<CropRect>,
}

impl Transform {
    /// Create an identity transform (no edits)
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this transform leaves the image untouched
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Drop all edits
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Size of the rendered image for a source of size `source`
    pub fn output_dimensions(&self, source: Dimensions) -> Dimensions {
        match self.crop {
            Some(crop) => crop.dimensions(),
            None => self.rotation.apply_to(source),
        }
    }

    /// Turn the result 90° clockwise, keeping any crop on the same pixels
    pub fn rotate_clockwise(&mut self, source: Dimensions) {
        let frame = self.rotation.apply_to(source);
        self.crop = self.crop.map(|crop| crop.rotate_clockwise(frame));
        self.rotation = self.rotation.clockwise();
    }

    /// Turn the result 90° counter-clockwise, keeping any crop on the same pixels
    pub fn rotate_counter_clockwise(&mut self, source: Dimensions) {
        let frame = self.rotation.apply_to(source);
        self.crop = self.crop.map(|crop| crop.rotate_counter_clockwise(frame));
        self.rotation = self.rotation.counter_clockwise();
    }

    /// Crop the current result to `rect`, given in rendered-image coordinates
    pub fn crop(&mut self, rect: CropRect, source: Dimensions) -> Result<()> {
        let invalid = Error::InvalidCrop {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        };

        let visible = self.output_dimensions(source);
        let rect = rect.clamp_to(visible).ok_or(invalid)?;

        self.crop = Some(match self.crop {
            Some(existing) => rect.offset_by(&existing),
            None => rect,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: Dimensions = (40, 30);

    #[test]
    fn test_default_is_identity() {
        assert!(Transform::new().is_identity());
        assert_eq!(Transform::new().output_dimensions(SOURCE), SOURCE);
    }

    #[test]
    fn test_four_rotations_return_to_identity() {
        let mut cw = Transform::new();
        let mut ccw = Transform::new();
        for _ in 0..4 {
            cw.rotate_clockwise(SOURCE);
            ccw.rotate_counter_clockwise(SOURCE);
        }
        assert!(cw.is_identity());
        assert!(ccw.is_identity());
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let mut transform = Transform::new();
        transform.rotate_clockwise(SOURCE);
        assert_eq!(transform.rotation.degrees(), 90);
        assert_eq!(transform.output_dimensions(SOURCE), (30, 40));

        transform.rotate_clockwise(SOURCE);
        assert_eq!(transform.output_dimensions(SOURCE), SOURCE);
    }

    #[test]
    fn test_crop_reduces_dimensions() {
        let mut transform = Transform::new();
        transform.crop(CropRect::new(5, 5, 10, 8), SOURCE).unwrap();
        assert_eq!(transform.output_dimensions(SOURCE), (10, 8));
    }

    #[test]
    fn test_crop_is_clamped_to_image() {
        let mut transform = Transform::new();
        transform.crop(CropRect::new(30, 20, 100, 100), SOURCE).unwrap();
        assert_eq!(transform.crop, Some(CropRect::new(30, 20, 10, 10)));
    }

    #[test]
    fn test_crop_outside_image_is_rejected() {
        let mut transform = Transform::new();
        let result = transform.crop(CropRect::new(50, 0, 10, 10), SOURCE);
        assert!(matches!(result, Err(Error::InvalidCrop { x: 50, .. })));

        let result = transform.crop(CropRect::new(0, 0, 0, 10), SOURCE);
        assert!(result.is_err());
        assert!(transform.is_identity());
    }

    #[test]
    fn test_second_crop_is_relative_to_first() {
        let mut transform = Transform::new();
        transform.crop(CropRect::new(10, 10, 20, 15), SOURCE).unwrap();
        transform.crop(CropRect::new(2, 3, 5, 5), SOURCE).unwrap();
        assert_eq!(transform.crop, Some(CropRect::new(12, 13, 5, 5)));
    }

    #[test]
    fn test_rotating_keeps_crop_on_same_pixels() {
        let mut transform = Transform::new();
        transform.crop(CropRect::new(4, 6, 10, 5), SOURCE).unwrap();

        transform.rotate_clockwise(SOURCE);
        // Rotated frame is 30x40; the old rows 6..11 become columns 19..24
        assert_eq!(transform.crop, Some(CropRect::new(19, 4, 5, 10)));

        transform.rotate_counter_clockwise(SOURCE);
        assert_eq!(transform.crop, Some(CropRect::new(4, 6, 10, 5)));
    }

    #[test]
    fn test_rotating_oversized_rect_does_not_underflow() {
        let rect = CropRect::new(0, 50, 600, 100);
        assert_eq!(rect.rotate_counter_clockwise((400, 1000)), CropRect::new(50, 0, 100, 600));
        assert_eq!(rect.rotate_clockwise((400, 90)), CropRect::new(0, 0, 100, 600));
    }

    #[test]
    fn test_centered_selection_fits_small_images() {
        assert_eq!(CropRect::centered(300, (1000, 800)), CropRect::new(350, 250, 300, 300));
        assert_eq!(CropRect::centered(300, (200, 120)), CropRect::new(40, 0, 120, 120));
    }

    #[test]
    fn test_reset() {
        let mut transform = Transform::new();
        transform.rotate_clockwise(SOURCE);
        transform.crop(CropRect::new(0, 0, 5, 5), SOURCE).unwrap();
        assert!(!transform.is_identity());

        transform.reset();

        assert!(transform.is_identity());
    }
}
