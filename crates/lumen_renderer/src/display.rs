//! Tone mapping and gamma for display.

use lumen_core::Color;
use rayon::prelude::*;

use crate::buffer::ImageBuffer;

/// Display gamma.
pub const GAMMA: f32 = 2.2;

/// Reinhard tone map followed by gamma encoding.
#[inline]
pub fn tone_map(color: Color) -> Color {
    let color = color.max(Color::ZERO);
    let mapped = color / (Color::ONE + color);
    mapped.powf(1.0 / GAMMA)
}

/// Tone map `source` into `target`, reallocating `target` if the
/// resolution differs.
pub fn present_into(source: &ImageBuffer, target: &mut ImageBuffer) {
    if target.width != source.width || target.height != source.height {
        *target = ImageBuffer::new(source.width, source.height);
    }

    target
        .pixels
        .par_iter_mut()
        .zip(source.pixels.par_iter())
        .for_each(|(out, &linear)| *out = tone_map(linear));
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a display-space color to 8-bit RGBA.
#[inline]
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x) + 0.5) as u8;
    let g = (255.0 * clamp_01(color.y) + 0.5) as u8;
    let b = (255.0 * clamp_01(color.z) + 0.5) as u8;
    [r, g, b, 255]
}

/// Convert a display-space buffer to RGBA bytes (for saving).
pub fn to_rgba8(image: &ImageBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(image.pixels.len() * 4);
    for color in &image.pixels {
        bytes.extend_from_slice(&color_to_rgba(*color));
    }
    bytes
}
