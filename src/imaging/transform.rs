use image::DynamicImage;

use crate::state::edit::{Rotation, Transform};

/// Render `transform` on top of `image`: rotate first, then crop.
pub fn apply(image: &DynamicImage, transform: &Transform) -> DynamicImage {
    let rotated = match transform.rotation {
        Rotation::None => image.clone(),
        Rotation::Cw90 => image.rotate90(),
        Rotation::Cw180 => image.rotate180(),
        Rotation::Cw270 => image.rotate270(),
    };

    match transform.crop {
        Some(rect) => rotated.crop_imm(rect.x, rect.y, rect.width, rect.height),
        None => rotated,
    }
}
