pub mod cli;
pub mod dicom;
pub mod display;
pub mod display_metadata;
pub mod host;
pub mod menu;
pub mod render;
pub mod types;
pub mod viewer;
pub mod window;

// Re-export commonly used functions
pub use display_metadata::{print_calibration, print_metadata};
pub use host::ImageHost;
pub use menu::Command;
pub use window::WindowLevelTool;
