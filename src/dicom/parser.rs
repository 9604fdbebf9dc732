use crate::types::{BitDepth, Dimensions, RescaleParams, SOPClass, TransferSyntax};
use anyhow::{Context, Result};
use dicom::core::dictionary::UidDictionary;
use dicom::dictionary_std::sop_class;
use dicom::dictionary_std::tags;
use dicom::encoding::TransferSyntaxIndex;
use dicom::object::{FileDicomObject, InMemDicomObject, StandardDataDictionary};
use dicom::transfer_syntax::TransferSyntaxRegistry;

type DicomFile = FileDicomObject<InMemDicomObject<StandardDataDictionary>>;

/// Partial metadata for error message context
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub modality: Option<String>,
    pub sop_class: Option<SOPClass>,
}

impl ErrorContext {
    pub fn format_error(&self, tag_name: &str) -> String {
        let mut parts = Vec::new();

        if let Some(modality) = &self.modality {
            parts.push(format!("Modality: {modality}"));
        }

        if let Some(sc) = &self.sop_class {
            parts.push(format!("SOP Class: {sc}")); // Uses Display: "Name (UID)"
        }

        if parts.is_empty() {
            // Generic error when no context available
            format!("Missing or invalid {tag_name} tag")
        } else {
            format!(
                "Missing or invalid {tag_name} tag - this may be a non-image DICOM file ({})",
                parts.join(", ")
            )
        }
    }
}

impl From<&DicomFile> for ErrorContext {
    fn from(obj: &DicomFile) -> Self {
        ErrorContext {
            modality: extract_string(obj, tags::MODALITY),
            sop_class: extract_sop_class(obj),
        }
    }
}

pub fn extract_dimensions(obj: &DicomFile, error_context: &ErrorContext) -> Result<Dimensions> {
    let rows = obj
        .get(tags::ROWS)
        .and_then(|e| e.to_int::<u16>().ok())
        .with_context(|| error_context.format_error("Rows"))?;

    let cols = obj
        .get(tags::COLUMNS)
        .and_then(|e| e.to_int::<u16>().ok())
        .with_context(|| error_context.format_error("Columns"))?;

    Ok(Dimensions::new(u32::from(cols), u32::from(rows)))
}

pub fn extract_bit_depth(obj: &DicomFile, error_context: &ErrorContext) -> Result<BitDepth> {
    let allocated = obj
        .get(tags::BITS_ALLOCATED)
        .and_then(|e| e.to_int::<u16>().ok())
        .with_context(|| error_context.format_error("Bits Allocated"))?;

    // Bits Stored falls back to Bits Allocated; only the allocation drives decoding
    let stored = obj
        .get(tags::BITS_STORED)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(allocated);

    Ok(BitDepth::new(allocated, stored))
}

/// Rescale tags as stored in the dataset, for reporting
pub fn extract_rescale_params(obj: &DicomFile) -> RescaleParams {
    let slope = obj
        .get(tags::RESCALE_SLOPE)
        .and_then(|e| e.to_float64().ok())
        .unwrap_or(1.0);

    let intercept = obj
        .get(tags::RESCALE_INTERCEPT)
        .and_then(|e| e.to_float64().ok())
        .unwrap_or(0.0);

    RescaleParams::new(slope, intercept)
}

#[inline]
pub fn extract_is_signed(obj: &DicomFile) -> bool {
    obj.get(tags::PIXEL_REPRESENTATION)
        .and_then(|e| e.to_int::<u16>().ok())
        .is_some_and(|repr| repr == 1)
}

#[inline]
pub fn extract_number_of_frames(obj: &DicomFile) -> u32 {
    obj.get(tags::NUMBER_OF_FRAMES)
        .and_then(|e| e.to_int::<u32>().ok())
        .unwrap_or(1)
}

#[inline]
pub fn extract_samples_per_pixel(obj: &DicomFile) -> u16 {
    obj.get(tags::SAMPLES_PER_PIXEL)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(1)
}

#[inline]
pub fn extract_planar_configuration(obj: &DicomFile) -> Option<u16> {
    obj.get(tags::PLANAR_CONFIGURATION)
        .and_then(|e| e.to_int::<u16>().ok())
}

pub fn extract_transfer_syntax(obj: &DicomFile) -> TransferSyntax {
    let uid = obj.meta().transfer_syntax().to_string();
    let name = TransferSyntaxRegistry
        .get(&uid)
        .map_or_else(|| "Unknown".to_string(), |ts| ts.name().to_string());

    TransferSyntax::new(uid, name)
}

pub fn extract_sop_class(obj: &DicomFile) -> Option<SOPClass> {
    obj.get(tags::SOP_CLASS_UID)
        .and_then(|e| e.value().to_str().ok())
        .map(|uid| {
            let uid = uid.trim_end_matches('\0').trim().to_string();
            let name = sop_class::StandardSopClassDictionary
                .by_uid(&uid)
                .map_or_else(|| "Unknown".to_string(), |entry| entry.name.to_string());
            SOPClass::new(uid, name)
        })
}

pub fn extract_string(obj: &DicomFile, tag: dicom::core::Tag) -> Option<String> {
    obj.get(tag)
        .and_then(|e| e.value().to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
