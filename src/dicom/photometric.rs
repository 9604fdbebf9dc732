//! Photometric interpretation (color space)

use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotometricInterpretation {
    Monochrome1,
    Monochrome2,
    Rgb,
    Unknown(String),
}

impl FromStr for PhotometricInterpretation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "MONOCHROME1" => Self::Monochrome1,
            "MONOCHROME2" => Self::Monochrome2,
            "RGB" => Self::Rgb,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl PhotometricInterpretation {
    #[inline(always)]
    #[must_use]
    pub fn is_grayscale(&self) -> bool {
        matches!(self, Self::Monochrome1 | Self::Monochrome2)
    }

    #[inline(always)]
    #[must_use]
    pub fn is_rgb(&self) -> bool {
        matches!(self, Self::Rgb)
    }

    /// MONOCHROME1 renders high values dark
    #[inline(always)]
    #[must_use]
    pub fn should_invert(&self) -> bool {
        matches!(self, Self::Monochrome1)
    }
}

impl Display for PhotometricInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monochrome1 => write!(f, "MONOCHROME1"),
            Self::Monochrome2 => write!(f, "MONOCHROME2"),
            Self::Rgb => write!(f, "RGB"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
