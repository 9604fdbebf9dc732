//! Rendering of a host image through its current display range

mod normalization;

pub use normalization::window_to_u8;

use crate::host::ImageHost;
use crate::viewer::{MemoryImage, Pixels};
use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, RgbImage};

/// Convert the image to 8-bit RGB using its display range
///
/// Grayscale values are windowed and replicated to R=G=B, inverted for
/// MONOCHROME1. RGB channels are stretched through the same range.
pub fn render_windowed(image: &MemoryImage) -> Result<DynamicImage> {
    let range = image.display_range();
    let dims = image.dimensions();

    let rgb_pixels: Vec<u8> = match image.pixels() {
        Pixels::Gray(values) => {
            // Pre-calculate inversion flag (avoid calling method for every pixel)
            let invert = image.is_inverted();
            values
                .iter()
                .flat_map(|&v| {
                    let gray = window_to_u8(v, &range);
                    let gray = if invert { 255 - gray } else { gray };
                    [gray, gray, gray]
                })
                .collect()
        }
        Pixels::Rgb(data) => data
            .iter()
            .map(|&c| window_to_u8(f64::from(c), &range))
            .collect(),
    };

    let rgb_image: RgbImage = ImageBuffer::from_raw(dims.width, dims.height, rgb_pixels)
        .context("Failed to create RGB image buffer")?;

    Ok(DynamicImage::ImageRgb8(rgb_image))
}
