//! CT detection and rescale calibration from image metadata

use super::tags::{get_tag_value, parse_number, tag_key};
use crate::host::ImageHost;
use crate::types::RescaleParams;
use dicom::core::Tag;
use dicom::dictionary_std::tags;
use log::debug;

/// SOP Class UID prefix shared by the CT storage classes
pub const CT_SOP_CLASS_PREFIX: &str = "1.2.840.10008.5.1.4.1.1.2";

/// Nuclear Medicine storage; also matches the CT prefix, so checked first
pub const NM_SOP_CLASS_PREFIX: &str = "1.2.840.10008.5.1.4.1.1.20";

/// Scanners whose CT data is stored with an implicit -1000 intercept
const OFFSET_MANUFACTURERS: [&str; 3] = ["VARICAM", "INFINIA", "QUASAR"];

const QUIRK_INTERCEPT: f64 = -1000.0;

const DEFAULT_LEVEL: f64 = 56.0;
const DEFAULT_WIDTH: f64 = 340.0;

/// Calibration of the active image, fixed until the image changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub rescale: RescaleParams,
    pub coefficient0: f64,
    pub is_ct: bool,
    pub default_level: f64,
    pub default_width: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rescale: RescaleParams::identity(),
            coefficient0: 0.0,
            is_ct: false,
            default_level: DEFAULT_LEVEL,
            default_width: DEFAULT_WIDTH,
        }
    }
}

impl Calibration {
    /// Derive calibration from a metadata text blob
    ///
    /// Missing or malformed tags never fail; they keep the default values.
    #[must_use]
    pub fn from_metadata(meta: Option<&str>, coefficient0: f64) -> Self {
        let mut cal = Self {
            coefficient0,
            ..Self::default()
        };

        let Some(meta) = meta else {
            return cal;
        };
        let Some(sop_class) = lookup(meta, tags::SOP_CLASS_UID) else {
            return cal;
        };
        if sop_class.starts_with(NM_SOP_CLASS_PREFIX) || !sop_class.starts_with(CT_SOP_CLASS_PREFIX) {
            return cal;
        }

        cal.is_ct = true;
        if coefficient0 == 0.0 {
            cal.rescale.intercept = number(meta, tags::RESCALE_INTERCEPT, 0.0);
        }
        cal.rescale.slope = number(meta, tags::RESCALE_SLOPE, 1.0);
        cal.default_level = number(meta, tags::WINDOW_CENTER, cal.default_level);
        cal.default_width = number(meta, tags::WINDOW_WIDTH, cal.default_width);

        if lookup(meta, tags::MANUFACTURER_MODEL_NAME)
            .is_some_and(|model| OFFSET_MANUFACTURERS.contains(&model))
        {
            cal.rescale.intercept = QUIRK_INTERCEPT;
            cal.default_level += QUIRK_INTERCEPT;
        }

        cal
    }

    /// Convert a stored-pixel window/level to calibrated units
    #[inline]
    #[must_use]
    pub fn to_calibrated(&self, window: f64, level: f64) -> (f64, f64) {
        let slope = self.rescale.slope;
        (
            window * slope,
            (level + self.coefficient0).mul_add(slope, self.rescale.intercept),
        )
    }

    /// Convert a calibrated window/level to stored-pixel units
    #[inline]
    #[must_use]
    pub fn to_stored(&self, window: f64, level: f64) -> (f64, f64) {
        let slope = self.rescale.slope;
        (
            window / slope,
            (level - self.rescale.intercept) / slope - self.coefficient0,
        )
    }
}

/// Metadata text of an image: a slice label holding embedded tags, else "Info"
#[must_use]
pub fn metadata_text<H: ImageHost + ?Sized>(image: &H) -> Option<&str> {
    image
        .slice_label(1)
        .filter(|label| label.contains(&tag_key(tags::PATIENT_NAME)))
        .or_else(|| image.info_property())
}

/// Recompute the calibration of `image` without touching it
#[must_use]
pub fn extract_calibration<H: ImageHost + ?Sized>(image: &H) -> Calibration {
    let cal = Calibration::from_metadata(metadata_text(image), image.coefficient0());
    debug!(
        "image {}: ct={} {} coef0={} default W/L {}/{}",
        image.id(),
        cal.is_ct,
        cal.rescale,
        cal.coefficient0,
        cal.default_width,
        cal.default_level
    );
    cal
}

fn lookup(meta: &str, tag: Tag) -> Option<&str> {
    get_tag_value(meta, &tag_key(tag))
}

fn number(meta: &str, tag: Tag, default: f64) -> f64 {
    let parsed = parse_number(lookup(meta, tag), default);
    if parsed.is_defaulted() {
        debug!("tag {} missing or malformed, using {default}", tag_key(tag));
    }
    parsed.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dimensions, ImageKind};
    use crate::viewer::MemoryImage;
    use approx::assert_relative_eq;

    fn ct_meta(extra: &str) -> String {
        format!(
            "0008,0016  SOP Class UID: 1.2.840.10008.5.1.4.1.1.2\n\
             0010,0010  Patient's Name: Anonymous\n\
             {extra}"
        )
    }

    #[test]
    fn test_no_metadata_is_not_ct() {
        let cal = Calibration::from_metadata(None, 0.0);
        assert!(!cal.is_ct);
        assert_eq!(cal.rescale, RescaleParams::identity());
        assert_relative_eq!(cal.default_level, 56.0);
        assert_relative_eq!(cal.default_width, 340.0);
    }

    #[test]
    fn test_missing_sop_class_is_not_ct() {
        let cal = Calibration::from_metadata(Some("0028,1053  Rescale Slope: 2\n"), 0.0);
        assert!(!cal.is_ct);
        assert_relative_eq!(cal.rescale.slope, 1.0);
    }

    #[test]
    fn test_nuclear_medicine_is_excluded() {
        let meta = "0008,0016  SOP Class UID: 1.2.840.10008.5.1.4.1.1.20\n\
                    0028,1052  Rescale Intercept: -1024\n\
                    0028,1053  Rescale Slope: 2.0\n";
        let cal = Calibration::from_metadata(Some(meta), 0.0);
        assert!(!cal.is_ct);
        assert_eq!(cal.rescale, RescaleParams::identity());
    }

    #[test]
    fn test_other_modality_is_not_ct() {
        let meta = "0008,0016  SOP Class UID: 1.2.840.10008.5.1.4.1.1.4\n";
        assert!(!Calibration::from_metadata(Some(meta), 0.0).is_ct);
    }

    #[test]
    fn test_enhanced_ct_matches_prefix() {
        let meta = "0008,0016  SOP Class UID: 1.2.840.10008.5.1.4.1.1.2.1\n";
        assert!(Calibration::from_metadata(Some(meta), 0.0).is_ct);
    }

    #[test]
    fn test_ct_rescale_and_window() {
        let meta = ct_meta(
            "0028,1050  Window Center: 40\n\
             0028,1051  Window Width: 400\n\
             0028,1052  Rescale Intercept: -1024\n\
             0028,1053  Rescale Slope: 2.0\n",
        );
        let cal = Calibration::from_metadata(Some(&meta), 0.0);

        assert!(cal.is_ct);
        assert_relative_eq!(cal.rescale.slope, 2.0);
        assert_relative_eq!(cal.rescale.intercept, -1024.0);
        assert_relative_eq!(cal.default_level, 40.0);
        assert_relative_eq!(cal.default_width, 400.0);
    }

    #[test]
    fn test_intercept_ignored_when_coefficient_present() {
        let meta = ct_meta("0028,1052  Rescale Intercept: -1024\n0028,1053  Rescale Slope: 1\n");
        let cal = Calibration::from_metadata(Some(&meta), -32768.0);

        assert!(cal.is_ct);
        assert_relative_eq!(cal.rescale.intercept, 0.0);
        assert_relative_eq!(cal.coefficient0, -32768.0);
    }

    #[test]
    fn test_malformed_values_keep_defaults() {
        let meta = ct_meta(
            "0028,1050  Window Center: 40\\400\n\
             0028,1051  Window Width: wide\n\
             0028,1053  Rescale Slope: \n",
        );
        let cal = Calibration::from_metadata(Some(&meta), 0.0);

        assert!(cal.is_ct);
        assert_relative_eq!(cal.rescale.slope, 1.0);
        assert_relative_eq!(cal.default_level, 56.0);
        assert_relative_eq!(cal.default_width, 340.0);
    }

    #[test]
    fn test_manufacturer_quirk_forces_intercept() {
        let meta = ct_meta(
            "0008,1090  Manufacturer's Model Name: INFINIA\n\
             0028,1050  Window Center: 40\n\
             0028,1052  Rescale Intercept: -1024\n",
        );
        let cal = Calibration::from_metadata(Some(&meta), 0.0);

        assert_relative_eq!(cal.rescale.intercept, -1000.0);
        assert_relative_eq!(cal.default_level, -960.0);
    }

    #[test]
    fn test_manufacturer_must_match_exactly() {
        let meta = ct_meta(
            "0008,1090  Manufacturer's Model Name: Infinia Hawkeye\n\
             0028,1052  Rescale Intercept: -1024\n",
        );
        let cal = Calibration::from_metadata(Some(&meta), 0.0);
        assert_relative_eq!(cal.rescale.intercept, -1024.0);
    }

    #[test]
    fn test_calibrated_conversions_are_inverse() {
        let cal = Calibration {
            rescale: RescaleParams::new(2.0, -1024.0),
            coefficient0: -32768.0,
            ..Calibration::default()
        };
        let (w, l) = cal.to_stored(400.0, 40.0);
        let (w2, l2) = cal.to_calibrated(w, l);
        assert_relative_eq!(w2, 400.0);
        assert_relative_eq!(l2, 40.0, epsilon = 1e-9);
    }

    fn image() -> MemoryImage {
        MemoryImage::gray(ImageKind::Gray16, Dimensions::new(1, 1), vec![0.0])
    }

    #[test]
    fn test_slice_label_with_tags_wins_over_info() {
        let label = ct_meta("0028,1052  Rescale Intercept: -1024\n");
        let image = image()
            .with_slice_label(label)
            .with_info("0008,0016  SOP Class UID: 1.2.840.10008.5.1.4.1.1.4\n");

        let cal = extract_calibration(&image);
        assert!(cal.is_ct);
        assert_relative_eq!(cal.rescale.intercept, -1024.0);
    }

    #[test]
    fn test_plain_slice_label_falls_back_to_info() {
        let image = image()
            .with_slice_label("IMG0001.dcm")
            .with_info(ct_meta("0028,1053  Rescale Slope: 2\n"));

        assert_eq!(metadata_text(&image), image.info_property());
        let cal = extract_calibration(&image);
        assert!(cal.is_ct);
        assert_relative_eq!(cal.rescale.slope, 2.0);
    }

    #[test]
    fn test_no_label_or_info_is_not_ct() {
        let image = image();
        assert_eq!(metadata_text(&image), None);
        assert!(!extract_calibration(&image).is_ct);
    }
}
