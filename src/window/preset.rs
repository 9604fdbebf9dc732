//! Named CT windows in calibrated (Hounsfield) units

use crate::dicom::Calibration;
use crate::types::DisplayRange;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtPreset {
    pub name: &'static str,
    pub level: f64,
    pub width: f64,
}

impl CtPreset {
    const fn new(name: &'static str, level: f64, width: f64) -> Self {
        Self { name, level, width }
    }

    /// Display range in stored-pixel units under `cal`
    #[must_use]
    pub fn to_display_range(&self, cal: &Calibration) -> DisplayRange {
        let (width, level) = cal.to_stored(self.width, self.level);
        DisplayRange::from_window_level(width, level)
    }
}

impl fmt::Display for CtPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (L {} / W {})", self.name, self.level, self.width)
    }
}

/// Catalog in menu order
pub static CT_PRESETS: [CtPreset; 25] = [
    // Body regions
    CtPreset::new("Brain", 40.0, 80.0),
    CtPreset::new("Lung", -500.0, 1500.0),
    CtPreset::new("Abdomen", 56.0, 340.0),
    CtPreset::new("Liver", 93.0, 108.0),
    CtPreset::new("Spleen", 50.0, 100.0),
    CtPreset::new("Kidney", 40.0, 400.0),
    CtPreset::new("Bone", 300.0, 1500.0),
    CtPreset::new("Spine", 150.0, 1000.0),
    CtPreset::new("Mediastinum", 40.0, 350.0),
    CtPreset::new("Heart", 50.0, 400.0),
    // Brain
    CtPreset::new("Brain-GrayMatter", 35.0, 70.0),
    CtPreset::new("Brain-WhiteMatter", 45.0, 90.0),
    CtPreset::new("Brain-CSF", 15.0, 40.0),
    // Lung
    CtPreset::new("Lung-UpperLobe", -450.0, 1400.0),
    CtPreset::new("Lung-LowerLobe", -520.0, 1600.0),
    CtPreset::new("Lung-MiddleLobe", -480.0, 1500.0),
    // Abdomen
    CtPreset::new("Abdomen-Liver", 60.0, 350.0),
    CtPreset::new("Abdomen-Spleen", 50.0, 100.0),
    CtPreset::new("Abdomen-Kidney", 40.0, 400.0),
    CtPreset::new("Abdomen-Pancreas", 55.0, 300.0),
    // Bone
    CtPreset::new("Bone-Vertebra", 200.0, 1000.0),
    CtPreset::new("Bone-Skull", 600.0, 2800.0),
    CtPreset::new("Bone-Ribs", 500.0, 2500.0),
    // Vessels and heart
    CtPreset::new("Mediastinum-LargeVessels", 40.0, 400.0),
    CtPreset::new("Heart-Myocardium", 50.0, 350.0),
];

/// Exact, case-sensitive lookup by name
#[must_use]
pub fn find_preset(name: &str) -> Option<&'static CtPreset> {
    CT_PRESETS.iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RescaleParams;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = CT_PRESETS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), CT_PRESETS.len());
    }

    #[test]
    fn test_catalog_order() {
        assert_eq!(CT_PRESETS[0].name, "Brain");
        assert_eq!(CT_PRESETS[10].name, "Brain-GrayMatter");
        assert_eq!(CT_PRESETS[CT_PRESETS.len() - 1].name, "Heart-Myocardium");
    }

    #[test]
    fn test_find_is_exact() {
        assert_relative_eq!(find_preset("Lung").map_or(0.0, |p| p.width), 1500.0);
        assert!(find_preset("lung").is_none());
        assert!(find_preset("Lung ").is_none());
        assert!(find_preset("").is_none());
    }

    #[test]
    fn test_brain_under_identity_calibration() {
        let range = CT_PRESETS[0].to_display_range(&Calibration::default());
        assert_relative_eq!(range.min, 0.0);
        assert_relative_eq!(range.max, 80.0);
    }

    #[test]
    fn test_lung_under_ct_calibration() {
        let cal = Calibration {
            rescale: RescaleParams::new(1.0, -1024.0),
            is_ct: true,
            ..Calibration::default()
        };
        let range = CT_PRESETS[1].to_display_range(&cal);
        // level 524 stored, width 1500
        assert_relative_eq!(range.min, -226.0);
        assert_relative_eq!(range.max, 1274.0);
    }

    #[test]
    fn test_signed_storage_offset_and_slope() {
        // Signed storage with slope 2 and intercept -1024 folded into the offset
        let cal = Calibration {
            rescale: RescaleParams::new(2.0, 0.0),
            coefficient0: -1024.0 / 2.0 - 32768.0,
            is_ct: true,
            ..Calibration::default()
        };
        let range = CT_PRESETS[0].to_display_range(&cal);
        // width 40, level (40 + 1024) / 2 + 32768
        assert_relative_eq!(range.min, 33280.0);
        assert_relative_eq!(range.max, 33320.0);
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(CT_PRESETS[1].to_string(), "Lung (L -500 / W 1500)");
    }
}
