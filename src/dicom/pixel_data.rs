//! DICOM pixel data extraction
//!
//! Pixel data is decoded once, normalized to little-endian bytes and then
//! turned into the sample layout of an in-memory host image. Only the first
//! frame is kept.

use super::metadata::DicomMetadata;
use anyhow::{Context, Result};
use dicom::dictionary_std::tags;
use dicom::object::{FileDicomObject, InMemDicomObject, StandardDataDictionary};
use dicom::pixeldata::PixelDecoder;

/// Offset added to signed 16-bit samples so they can be stored unsigned
pub const SIGNED_16_OFFSET: f64 = 32768.0;

/// Extract pixel data from DICOM object as little-endian bytes
pub fn extract_pixel_data(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    metadata: &DicomMetadata,
) -> Result<Vec<u8>> {
    let bytes_per_sample = metadata.bit_depth.bytes_per_sample();
    if metadata.is_big_endian() && bytes_per_sample > 1 {
        extract_big_endian(obj, bytes_per_sample)
    } else {
        let decoded = obj
            .decode_pixel_data()
            .context("Failed to decode pixel data")?;
        Ok(decoded.data().to_vec())
    }
}

/// Extract big-endian pixel data and convert to little-endian
fn extract_big_endian(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    bytes_per_sample: usize,
) -> Result<Vec<u8>> {
    let raw_bytes = obj
        .get(tags::PIXEL_DATA)
        .context("Missing pixel data")?
        .to_bytes()
        .context("Failed to get raw pixel data bytes")?;

    if !raw_bytes.len().is_multiple_of(bytes_per_sample) {
        anyhow::bail!("Invalid {}-bit pixel data length", bytes_per_sample * 8);
    }

    Ok(raw_bytes
        .chunks_exact(bytes_per_sample)
        .flat_map(|chunk| chunk.iter().rev().copied())
        .collect())
}

/// First frame of grayscale data as sample values
///
/// Signed 16-bit samples are shifted by [`SIGNED_16_OFFSET`]; the host
/// compensates through its calibration coefficients.
pub fn gray_samples(data: &[u8], metadata: &DicomMetadata) -> Result<Vec<f64>> {
    let count = metadata.dimensions.pixel_count();
    let bytes_per_sample = metadata.bit_depth.bytes_per_sample();
    let frame = first_frame(data, count * bytes_per_sample)?;
    let signed = metadata.signed;

    let samples = match metadata.bits_allocated() {
        8 if signed => frame.iter().map(|&b| f64::from(b as i8)).collect(),
        8 => frame.iter().map(|&b| f64::from(b)).collect(),
        16 => frame
            .chunks_exact(2)
            .map(|c| {
                if signed {
                    f64::from(i16::from_le_bytes([c[0], c[1]])) + SIGNED_16_OFFSET
                } else {
                    f64::from(u16::from_le_bytes([c[0], c[1]]))
                }
            })
            .collect(),
        32 => frame
            .chunks_exact(4)
            .map(|c| {
                let bytes = [c[0], c[1], c[2], c[3]];
                if signed {
                    f64::from(i32::from_le_bytes(bytes))
                } else {
                    f64::from(u32::from_le_bytes(bytes))
                }
            })
            .collect(),
        bits => anyhow::bail!("Unsupported bits allocated for grayscale: {bits}"),
    };

    Ok(samples)
}

/// First frame of 8-bit RGB data, interleaved
pub fn rgb_samples(data: &[u8], metadata: &DicomMetadata) -> Result<Vec<u8>> {
    if metadata.bits_allocated() != 8 {
        anyhow::bail!(
            "Unsupported bits allocated for RGB: {} (expected 8)",
            metadata.bits_allocated()
        );
    }

    let count = metadata.dimensions.pixel_count();
    let frame = first_frame(data, count * 3)?;

    if metadata.is_planar() {
        let (r, rest) = frame.split_at(count);
        let (g, b) = rest.split_at(count);
        Ok(r.iter()
            .zip(g)
            .zip(b)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect())
    } else {
        Ok(frame.to_vec())
    }
}

fn first_frame(data: &[u8], expected_size: usize) -> Result<&[u8]> {
    if data.len() < expected_size {
        anyhow::bail!(
            "Invalid pixel data size: expected {expected_size} bytes for first frame, got {}",
            data.len()
        );
    }
    Ok(&data[..expected_size])
}
