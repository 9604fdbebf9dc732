//! DICOM file access, metadata-driven calibration and host image loading
//!
//! The window/level core only reads a handful of tags from a text dump of the
//! dataset ([`tags`], [`calibration`]). The loader turns a file into an
//! in-memory host image carrying that dump as its "Info" property.

pub mod calibration;
mod error;
pub mod info;
mod metadata;
mod parser;
mod photometric;
mod pixel_data;
pub mod tags;

// Re-export public API
pub use calibration::{Calibration, extract_calibration};
pub use error::ProcessError;
pub use info::build_info_text;
pub use metadata::DicomMetadata;
pub use photometric::PhotometricInterpretation;
pub use pixel_data::SIGNED_16_OFFSET;
pub use tags::{get_tag_value, parse_number, tag_key};

use crate::types::{ImageKind, RescaleParams};
use crate::viewer::MemoryImage;
use anyhow::{Context, Result};
use dicom::dictionary_std::tags as dcm_tags;
use dicom::object::{FileDicomObject, InMemDicomObject, StandardDataDictionary, open_file};
use std::path::Path;
use std::str::FromStr;

/// Open and parse a DICOM file
pub fn open_dicom_file(file_path: &Path) -> Result<FileDicomObject<InMemDicomObject<StandardDataDictionary>>> {
    open_file(file_path)
        .with_context(|| format!("Failed to open DICOM file: {}", file_path.display()))
}

/// Extract the image attributes of a DICOM object
pub fn extract_dicom_data(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Result<DicomMetadata> {
    let error_context = parser::ErrorContext::from(obj);

    let dimensions = parser::extract_dimensions(obj, &error_context)?;
    let bit_depth = parser::extract_bit_depth(obj, &error_context)?;

    // Parse photometric interpretation
    let photometric_interpretation = parser::extract_string(obj, dcm_tags::PHOTOMETRIC_INTERPRETATION)
        .map(|s| {
            PhotometricInterpretation::from_str(&s)
                .map_err(|_| anyhow::anyhow!("Unknown photometric interpretation: {s}"))
        })
        .transpose()?
        .unwrap_or(PhotometricInterpretation::Monochrome2); // Default to Monochrome2

    Ok(DicomMetadata {
        dimensions,
        bit_depth,
        signed: parser::extract_is_signed(obj),
        samples_per_pixel: parser::extract_samples_per_pixel(obj),
        planar_configuration: parser::extract_planar_configuration(obj),
        number_of_frames: parser::extract_number_of_frames(obj),
        photometric_interpretation,
        rescale: parser::extract_rescale_params(obj),
        modality: error_context.modality,
        manufacturer_model: parser::extract_string(obj, dcm_tags::MANUFACTURER_MODEL_NAME),
        sop_class: error_context.sop_class,
        transfer_syntax: parser::extract_transfer_syntax(obj),
    })
}

/// Build an in-memory host image from a DICOM object
///
/// `label` becomes the first slice label (typically the file name); the
/// dataset dump is attached as the "Info" property.
pub fn load_image(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    metadata: &DicomMetadata,
    label: &str,
) -> Result<MemoryImage> {
    let data = pixel_data::extract_pixel_data(obj, metadata)?;
    let pi = &metadata.photometric_interpretation;

    let image = match (metadata.samples_per_pixel, metadata.bits_allocated()) {
        (3, _) if pi.is_rgb() => {
            MemoryImage::rgb(metadata.dimensions, pixel_data::rgb_samples(&data, metadata)?)
        }
        (1, bits) if pi.is_grayscale() => {
            let kind = match bits {
                8 => ImageKind::Gray8,
                16 => ImageKind::Gray16,
                32 => ImageKind::Gray32,
                other => anyhow::bail!("Unsupported bits allocated for grayscale: {other}"),
            };
            let samples = pixel_data::gray_samples(&data, metadata)?;
            let image = MemoryImage::gray(kind, metadata.dimensions, samples)
                .with_inverted(pi.should_invert());
            match calibration_function(metadata) {
                Some(coefficients) => image.with_coefficients(coefficients),
                None => image,
            }
        }
        (samples, _) => anyhow::bail!(
            "Unsupported photometric interpretation {pi} with {samples} samples per pixel"
        ),
    };

    Ok(image
        .with_slice_label(label)
        .with_info(build_info_text(obj)))
}

/// Straight-line calibration `[offset, 1]` of a signed 16-bit host image
///
/// The storage offset absorbs the rescale intercept in slope units, so the
/// extractor's `(level + offset) * slope` yields rescaled values directly.
/// Unsigned data has no function and is rescaled from its tags.
fn calibration_function(metadata: &DicomMetadata) -> Option<Vec<f64>> {
    if metadata.bits_allocated() != 16 || !metadata.signed {
        return None;
    }
    let RescaleParams { slope, intercept } = metadata.rescale;
    let slope = if slope == 0.0 { 1.0 } else { slope };
    Some(vec![intercept / slope - SIGNED_16_OFFSET, 1.0])
}
