//! DICOM metadata structure

use super::photometric::PhotometricInterpretation;
use crate::types::{BitDepth, Dimensions, RescaleParams, SOPClass, TransferSyntax};

/// Image attributes needed to build a host image, plus display-only fields
#[derive(Debug, Clone)]
pub struct DicomMetadata {
    pub dimensions: Dimensions,
    pub bit_depth: BitDepth,
    pub signed: bool,                      // Pixel Representation 1
    pub samples_per_pixel: u16,            // 1 for grayscale, 3 for RGB
    pub planar_configuration: Option<u16>, // 0 = interleaved, 1 = planar (RGB only)
    pub number_of_frames: u32,
    pub photometric_interpretation: PhotometricInterpretation,
    pub rescale: RescaleParams,

    // Display metadata fields
    pub modality: Option<String>,
    pub manufacturer_model: Option<String>,
    pub sop_class: Option<SOPClass>,
    pub transfer_syntax: TransferSyntax,
}

impl DicomMetadata {
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    #[inline(always)]
    #[must_use]
    pub fn bits_allocated(&self) -> u16 {
        self.bit_depth.allocated
    }

    /// Returns true if this DICOM file uses big-endian byte order
    #[inline(always)]
    #[must_use]
    pub fn is_big_endian(&self) -> bool {
        self.transfer_syntax.is_big_endian()
    }

    #[inline]
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.planar_configuration == Some(1)
    }
}
