//! In-memory image host
//!
//! Holds decoded pixels and the viewer-side state (display range, status line,
//! redraw requests) that a windowing tool drives through [`ImageHost`].

use crate::host::ImageHost;
use crate::types::{Dimensions, DisplayRange, HistogramStats, ImageId, ImageKind};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Stored pixel values
#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    /// Grayscale samples, row-major
    Gray(Vec<f64>),
    /// Interleaved 8-bit RGB triplets
    Rgb(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct MemoryImage {
    id: ImageId,
    kind: ImageKind,
    dimensions: Dimensions,
    pixels: Pixels,
    snapshot: Option<Vec<u8>>,
    coefficients: Option<Vec<f64>>,
    slice_label: Option<String>,
    info: Option<String>,
    magnification: f64,
    visible: bool,
    range: DisplayRange,
    status: Option<String>,
    redraw_count: usize,
    last_redraw: Option<bool>,
    invert: bool,
}

impl MemoryImage {
    /// Grayscale image; `kind` must be one of the gray kinds
    #[must_use]
    pub fn gray(kind: ImageKind, dimensions: Dimensions, values: Vec<f64>) -> Self {
        Self::with_pixels(kind, dimensions, Pixels::Gray(values))
    }

    #[must_use]
    pub fn rgb(dimensions: Dimensions, data: Vec<u8>) -> Self {
        Self::with_pixels(ImageKind::ColorRgb, dimensions, Pixels::Rgb(data))
    }

    fn with_pixels(kind: ImageKind, dimensions: Dimensions, pixels: Pixels) -> Self {
        let mut image = Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            kind,
            dimensions,
            pixels,
            snapshot: None,
            coefficients: None,
            slice_label: None,
            info: None,
            magnification: 1.0,
            visible: true,
            range: DisplayRange::default(),
            status: None,
            redraw_count: 0,
            last_redraw: None,
            invert: false,
        };
        image.range = image.default_range();
        image
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    #[must_use]
    pub fn with_slice_label(mut self, label: impl Into<String>) -> Self {
        self.slice_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_coefficients(mut self, coefficients: Vec<f64>) -> Self {
        self.coefficients = Some(coefficients);
        self
    }

    #[must_use]
    pub fn with_magnification(mut self, magnification: f64) -> Self {
        self.magnification = magnification;
        self
    }

    /// Render with high values dark (MONOCHROME1)
    #[must_use]
    pub fn with_inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Last status line shown
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Number of redraw requests so far
    #[must_use]
    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    /// Kind of the latest redraw request; `true` marks a full repaint
    #[must_use]
    pub fn last_redraw(&self) -> Option<bool> {
        self.last_redraw
    }

    /// Bit-depth derived range: full 8-bit scale, otherwise the pixel extremes
    #[must_use]
    pub fn default_range(&self) -> DisplayRange {
        match (&self.pixels, self.kind) {
            (Pixels::Rgb(_), _) | (_, ImageKind::Gray8 | ImageKind::ColorRgb) => {
                DisplayRange::new(0.0, 255.0)
            }
            (Pixels::Gray(values), _) => {
                let stats = HistogramStats::from_values(values);
                DisplayRange::new(stats.min, stats.max)
            }
        }
    }
}

impl ImageHost for MemoryImage {
    fn id(&self) -> ImageId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn kind(&self) -> ImageKind {
        self.kind
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn magnification(&self) -> f64 {
        self.magnification
    }

    fn display_range(&self) -> DisplayRange {
        self.range
    }

    fn set_display_range(&mut self, range: DisplayRange) {
        self.range = range;
    }

    fn reset_display_range(&mut self) {
        self.range = self.default_range();
    }

    fn uncalibrated_statistics(&self) -> HistogramStats {
        match &self.pixels {
            Pixels::Gray(values) => HistogramStats::from_values(values),
            Pixels::Rgb(data) => {
                let luma: Vec<f64> = data
                    .chunks_exact(3)
                    .map(|px| (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0)
                    .collect();
                HistogramStats::from_values(&luma)
            }
        }
    }

    fn calibration_coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    fn slice_label(&self, slice: usize) -> Option<&str> {
        if slice == 1 { self.slice_label.as_deref() } else { None }
    }

    fn info_property(&self) -> Option<&str> {
        self.info.as_deref()
    }

    fn redraw(&mut self, full: bool) {
        self.redraw_count += 1;
        self.last_redraw = Some(full);
    }

    fn show_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }

    fn snapshot(&mut self) {
        if let Pixels::Rgb(data) = &self.pixels {
            self.snapshot = Some(data.clone());
        }
    }

    fn restore_snapshot(&mut self) {
        if let (Pixels::Rgb(data), Some(saved)) = (&mut self.pixels, &self.snapshot) {
            data.clone_from(saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ids_are_unique() {
        let a = MemoryImage::gray(ImageKind::Gray16, Dimensions::new(1, 1), vec![0.0]);
        let b = MemoryImage::gray(ImageKind::Gray16, Dimensions::new(1, 1), vec![0.0]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_default_ranges_by_kind() {
        let values = vec![100.0, 2000.0, 4000.0];
        let gray16 = MemoryImage::gray(ImageKind::Gray16, Dimensions::new(3, 1), values.clone());
        assert_eq!(gray16.display_range(), DisplayRange::new(100.0, 4000.0));

        let gray8 = MemoryImage::gray(ImageKind::Gray8, Dimensions::new(3, 1), vec![1.0, 2.0, 3.0]);
        assert_eq!(gray8.display_range(), DisplayRange::new(0.0, 255.0));

        let rgb = MemoryImage::rgb(Dimensions::new(1, 1), vec![10, 20, 30]);
        assert_eq!(rgb.display_range(), DisplayRange::new(0.0, 255.0));
    }

    #[test]
    fn test_reset_restores_default_range() {
        let mut image = MemoryImage::gray(ImageKind::Gray32, Dimensions::new(2, 1), vec![-5.0, 5.0]);
        image.set_display_range(DisplayRange::new(0.0, 1.0));
        image.reset_display_range();
        assert_eq!(image.display_range(), DisplayRange::new(-5.0, 5.0));
    }

    #[test]
    fn test_coefficient0_from_calibration() {
        let image = MemoryImage::gray(ImageKind::Gray16, Dimensions::new(1, 1), vec![0.0]);
        assert_relative_eq!(image.coefficient0(), 0.0);

        let image = image.with_coefficients(vec![-32768.0, 1.0]);
        assert_relative_eq!(image.coefficient0(), -32768.0);
    }

    #[test]
    fn test_only_first_slice_has_label() {
        let image = MemoryImage::gray(ImageKind::Gray16, Dimensions::new(1, 1), vec![0.0])
            .with_slice_label("scan.dcm");
        assert_eq!(image.slice_label(1), Some("scan.dcm"));
        assert_eq!(image.slice_label(2), None);
    }

    #[test]
    fn test_rgb_snapshot_round_trip() {
        let mut image = MemoryImage::rgb(Dimensions::new(1, 1), vec![1, 2, 3]);
        image.snapshot();
        if let Pixels::Rgb(data) = &mut image.pixels {
            data[0] = 99;
        }
        image.restore_snapshot();
        assert_eq!(image.pixels(), &Pixels::Rgb(vec![1, 2, 3]));
    }

    #[test]
    fn test_redraws_are_counted() {
        let mut image = MemoryImage::rgb(Dimensions::new(1, 1), vec![1, 2, 3]);
        assert_eq!((image.redraw_count(), image.last_redraw()), (0, None));

        for _ in 0..1000 {
            image.redraw(false);
        }
        image.redraw(true);
        assert_eq!((image.redraw_count(), image.last_redraw()), (1001, Some(true)));
    }
}
