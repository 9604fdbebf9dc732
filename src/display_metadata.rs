use crate::dicom::{Calibration, DicomMetadata};

pub fn print_metadata(metadata: &DicomMetadata) {
    print_field("Modality", metadata.modality.as_ref());
    print_field("Model", metadata.manufacturer_model.as_ref());

    print_dimensions(metadata);
    println!("{:20}: {}", "Bit Depth", metadata.bit_depth);
    if metadata.number_of_frames > 1 {
        println!(
            "{:20}: {} (first shown)",
            "Frames", metadata.number_of_frames
        );
    }
    println!("{:20}: {}", "Rescale", metadata.rescale);

    print_sop_class_info(metadata);
    print_transfer_syntax_info(metadata);
}

pub fn print_calibration(calibration: &Calibration) {
    if calibration.is_ct {
        println!("{:20}: {}", "CT Calibration", calibration.rescale);
        println!(
            "{:20}: W {} / L {}",
            "Default Window", calibration.default_width, calibration.default_level
        );
    } else {
        println!("{:20}: none (not CT)", "CT Calibration");
    }
    println!();
}

fn print_field(name: &str, value: Option<&String>) {
    if let Some(v) = value {
        println!("{name:20}: {v}");
    }
}

fn print_dimensions(metadata: &DicomMetadata) {
    println!(
        "{:20}: {}x{} [{}]",
        "Dimensions",
        metadata.dimensions,
        metadata.samples_per_pixel,
        metadata.photometric_interpretation
    );
}

fn print_sop_class_info(metadata: &DicomMetadata) {
    if let Some(sop_class) = &metadata.sop_class {
        println!("{:20}: {}", "SOP Class UID", sop_class);
    }
}

fn print_transfer_syntax_info(metadata: &DicomMetadata) {
    println!("{:20}: {}", "Transfer Syntax", metadata.transfer_syntax);
}
