//! Domain-specific types shared by the window/level engine and its hosts

use dicom::transfer_syntax::entries;
use std::fmt;

/// DICOM transfer syntax (UID, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSyntax {
    pub uid: String,
    pub name: String,
}

impl TransferSyntax {
    #[must_use]
    pub fn new(uid: String, name: String) -> Self {
        Self { uid, name }
    }

    #[inline]
    #[must_use]
    #[allow(deprecated)] // Explicit VR Big Endian is retired but still in use
    pub fn is_big_endian(&self) -> bool {
        self.uid == entries::EXPLICIT_VR_BIG_ENDIAN.uid()
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{name} ({uid})", name = self.name, uid = self.uid)
    }
}

/// SOP Class (UID, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SOPClass {
    pub uid: String,
    pub name: String,
}

impl SOPClass {
    #[must_use]
    pub fn new(uid: String, name: String) -> Self {
        Self { uid, name }
    }
}

impl fmt::Display for SOPClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{name} ({uid})", name = self.name, uid = self.uid)
    }
}

/// Bit depth information for pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth {
    pub allocated: u16,
    pub stored: u16,
}

impl BitDepth {
    #[must_use]
    pub fn new(allocated: u16, stored: u16) -> Self {
        Self { allocated, stored }
    }

    #[inline]
    #[must_use]
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.allocated / 8)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{stored}/{allocated} bits",
            stored = self.stored,
            allocated = self.allocated
        )
    }
}

/// Identity of a host-owned image
///
/// Two handles with the same id refer to the same image; content is never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pixel layout of a host image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gray8,
    Gray16,
    Gray32,
    ColorRgb,
}

impl ImageKind {
    #[inline]
    #[must_use]
    pub fn is_rgb(self) -> bool {
        matches!(self, Self::ColorRgb)
    }

    /// Bits per pixel as reported to the tool (24 for packed RGB)
    #[inline]
    #[must_use]
    pub fn bit_depth(self) -> u8 {
        match self {
            Self::Gray8 => 8,
            Self::Gray16 => 16,
            Self::Gray32 => 32,
            Self::ColorRgb => 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{width}x{height}", width = self.width, height = self.height)
    }
}

/// Visible value interval of an image, in stored-pixel units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range centred on `level` spanning `window`
    #[must_use]
    pub fn from_window_level(window: f64, level: f64) -> Self {
        Self {
            min: level - 0.5 * window,
            max: level + 0.5 * window,
        }
    }

    #[inline]
    #[must_use]
    pub fn window(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    #[must_use]
    pub fn level(&self) -> f64 {
        self.min + 0.5 * self.window()
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for DisplayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{min}, {max}]", min = self.min, max = self.max)
    }
}

/// Rescale parameters for converting stored pixel values to real units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleParams {
    pub slope: f64,
    pub intercept: f64,
}

impl RescaleParams {
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Default for RescaleParams {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for RescaleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slope={slope}, intercept={intercept}",
            slope = self.slope,
            intercept = self.intercept
        )
    }
}

/// Outcome of a best-effort parse: either the parsed value or the fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Defaulted(T),
}

impl<T: Copy> Parsed<T> {
    #[inline]
    #[must_use]
    pub fn value(&self) -> T {
        match *self {
            Self::Value(v) | Self::Defaulted(v) => v,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

/// Histogram statistics of an image, computed without calibration
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramStats {
    pub histogram: [u64; 256],
    pub pixel_count: u64,
    pub hist_min: f64,
    pub bin_size: f64,
    pub min: f64,
    pub max: f64,
}

impl HistogramStats {
    /// Bin `values` into 256 equal-width bins spanning their min and max
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        let mut histogram = [0u64; 256];
        if values.is_empty() {
            return Self {
                histogram,
                pixel_count: 0,
                hist_min: 0.0,
                bin_size: 1.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let range = max - min;
        let bin_size = if range > 0.0 { range / 256.0 } else { 1.0 };
        for &v in values {
            // Saturating cast keeps the max value in the last bin
            let idx = (((v - min) / bin_size) as usize).min(255);
            histogram[idx] += 1;
        }

        Self {
            histogram,
            pixel_count: values.len() as u64,
            hist_min: min,
            bin_size,
            min,
            max,
        }
    }
}
