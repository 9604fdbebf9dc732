use crate::menu::Command;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Interactive CT window/level for DICOM images in the terminal
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// DICOM file path(s) to display
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Menu command to run: Auto, Reset or a CT preset name (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LABEL")]
    pub commands: Vec<Command>,

    /// Pointer drag from X0,Y0 to X1,Y1 in canvas pixels (repeatable)
    #[arg(long = "drag", value_name = "X0,Y0:X1,Y1")]
    pub drags: Vec<Drag>,

    /// Canvas magnification used to scale drag distances
    #[arg(short, long, default_value_t = 1.0)]
    pub magnification: f64,

    /// Print the window/level menu and exit
    #[arg(short, long)]
    pub list_presets: bool,

    /// Output width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Skip rendering the image
    #[arg(long)]
    pub no_image: bool,

    /// Show DICOM metadata and calibration
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            commands: Vec::new(),
            drags: Vec::new(),
            magnification: 1.0,
            list_presets: false,
            width: None,
            height: None,
            no_image: false,
            verbose: false,
        }
    }
}

/// Press at `from`, release at `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

impl FromStr for Drag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected X0,Y0:X1,Y1, got '{s}'"))?;
        Ok(Self {
            from: parse_point(from)?,
            to: parse_point(to)?,
        })
    }
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok((coord(x)?, coord(y)?))
}
