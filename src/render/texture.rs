//! Frame to texture conversion

use egui::{Color32, ColorImage};
use image::RgbImage;

/// Update a color buffer from an RgbImage
///
/// Reuses the buffer's allocation between frames.
pub fn update_color_buffer(buffer: &mut Vec<Color32>, img: &RgbImage) {
    let len = img.width() as usize * img.height() as usize;

    buffer.clear();
    if buffer.capacity() < len {
        buffer.reserve(len - buffer.capacity());
    }

    buffer.extend(
        img.as_raw()
            .chunks_exact(3)
            .map(|p| Color32::from_rgb(p[0], p[1], p[2])),
    );
}

/// Build an egui image for upload, leaving the buffer's capacity in place
pub fn to_color_image(buffer: &mut Vec<Color32>, img: &RgbImage) -> ColorImage {
    update_color_buffer(buffer, img);
    ColorImage {
        size: [img.width() as usize, img.height() as usize],
        pixels: buffer.clone(),
    }
}
