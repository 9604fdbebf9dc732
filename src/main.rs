use clap::{CommandFactory, Parser};
use dcmwl::cli::Args;
use dcmwl::dicom::{self, ProcessError};
use dcmwl::host::ImageHost;
use dcmwl::types::Dimensions;
use dcmwl::viewer::MemoryImage;
use dcmwl::window::WindowLevelTool;
use dcmwl::{display, render};
use std::path::Path;

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.list_presets {
        print_menu(&mut WindowLevelTool::new());
        return;
    }

    if args.files.is_empty() {
        let _ = Args::command().print_help();
        println!();
        return;
    }

    let multiple_files = args.files.len() > 1;
    let mut any_failed = false;
    // One tool for the whole run, like a viewer switching between open images
    let mut tool = WindowLevelTool::new();

    for (idx, file_path) in args.files.iter().enumerate() {
        if multiple_files {
            println!("{}", file_path.display());
        }

        if let Err(e) = process_file(file_path, &args, &mut tool) {
            if args.verbose
                && let Some(metadata) = e.metadata()
            {
                dcmwl::print_metadata(metadata);
            }
            println!("Error: {e}");
            any_failed = true;
        }

        if multiple_files && idx < args.files.len() - 1 {
            println!();
        }
    }

    if any_failed {
        std::process::exit(1);
    }
}

/// Load a DICOM file, apply the requested window/level actions and show it
fn process_file(file_path: &Path, args: &Args, tool: &mut WindowLevelTool) -> Result<(), ProcessError> {
    // Stage 1: Open DICOM file
    let obj = dicom::open_dicom_file(file_path).map_err(ProcessError::NotADicomFile)?;

    // Stage 2: Extract metadata and build the host image
    let metadata = dicom::extract_dicom_data(&obj).map_err(ProcessError::ExtractionFailed)?;
    let label = file_path
        .file_name()
        .map_or_else(|| file_path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut image = dicom::load_image(&obj, &metadata, &label)
        .map_err(ProcessError::ExtractionFailed)?
        .with_magnification(args.magnification);

    // Stage 3: Verbose output
    if args.verbose {
        dcmwl::print_metadata(&metadata);
        dcmwl::print_calibration(&dicom::extract_calibration(&image));
    }

    // Stage 4: Window/level
    for command in &args.commands {
        if tool.run(&mut image, command).is_none() {
            log::warn!("'{command}' left {} unchanged", file_path.display());
        }
    }
    for drag in &args.drags {
        tool.pointer_pressed(&mut image, drag.from.0, drag.from.1);
        tool.pointer_dragged(&mut image, drag.to.0, drag.to.1);
    }

    if let Some(status) = image.status() {
        println!("{status}");
    }
    println!("{:20}: {}", "Display Range", image.display_range());

    // Stage 5: Display
    if !args.no_image {
        render::render_windowed(&image)
            .and_then(|rendered| display::print_image(&rendered, args))
            .map_err(|error| ProcessError::DisplayFailed {
                metadata: Box::new(metadata),
                error,
            })?;
    }

    Ok(())
}

fn print_menu(tool: &mut WindowLevelTool) {
    // Any non-CT image yields the same items
    let mut placeholder = MemoryImage::rgb(Dimensions::new(0, 0), Vec::new());
    for item in &tool.menu(&mut placeholder).items {
        println!("{item}");
    }
}
