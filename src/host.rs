//! Interface to the image viewer that owns pixels, display range and canvas
//!
//! The window/level tool never owns an image. Every operation receives the
//! active image as `&mut impl ImageHost` and compares [`ImageId`]s to notice
//! when the viewer switched to another image.

use crate::types::{Dimensions, DisplayRange, HistogramStats, ImageId, ImageKind};

pub trait ImageHost {
    fn id(&self) -> ImageId;

    /// Whether the image is currently shown; hidden images ignore menu commands
    fn is_visible(&self) -> bool;

    fn kind(&self) -> ImageKind;

    fn bit_depth(&self) -> u8 {
        self.kind().bit_depth()
    }

    fn dimensions(&self) -> Dimensions;

    fn magnification(&self) -> f64;

    fn display_range(&self) -> DisplayRange;

    fn set_display_range(&mut self, range: DisplayRange);

    /// Restore the viewer's own default range for this image's bit depth
    fn reset_display_range(&mut self);

    /// Histogram statistics computed with the calibration function detached
    fn uncalibrated_statistics(&self) -> HistogramStats;

    /// Calibration function coefficients; the first one is the additive offset
    fn calibration_coefficients(&self) -> Option<&[f64]>;

    /// Label of a 1-based stack slice
    fn slice_label(&self, slice: usize) -> Option<&str>;

    /// The image's free-text "Info" property
    fn info_property(&self) -> Option<&str>;

    /// Repaint; `full` for RGB images whose pixels were rewritten
    fn redraw(&mut self, full: bool);

    fn show_status(&mut self, text: &str);

    /// Save RGB pixels so a later reset can restore them
    fn snapshot(&mut self) {}

    fn restore_snapshot(&mut self) {}

    /// Additive calibration offset, 0 when the image has no calibration function
    fn coefficient0(&self) -> f64 {
        self.calibration_coefficients()
            .and_then(|coef| coef.first().copied())
            .unwrap_or(0.0)
    }
}
