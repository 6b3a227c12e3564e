use iced::widget::image::Handle;
use image::DynamicImage;

/// Convert a decoded image into an iced handle for display.
///
/// The pixels are copied into a tightly packed RGBA8 buffer, which is the
/// only layout iced accepts for raw pixel handles.
pub fn to_handle(image: &DynamicImage) -> Handle {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_rgba(width, height, rgba.into_raw())
}
