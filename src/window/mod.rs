//! Interactive window/level tool
//!
//! [`WindowLevelTool`] reacts to pointer and menu events for the active image.
//! It owns only session state (calibration, press-time range, auto
//! sensitivity), which is replaced whenever the host switches images.

pub mod auto;
pub mod preset;

pub use auto::{AUTO_THRESHOLD, auto_range, next_threshold, scan_bounds};
pub use preset::{CT_PRESETS, CtPreset, find_preset};

use crate::dicom::{Calibration, extract_calibration};
use crate::host::ImageHost;
use crate::menu::{self, Command, MenuLayout};
use crate::types::{DisplayRange, ImageId};
use log::debug;

/// State bound to one image; discarded when another image becomes active
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSession {
    pub image: ImageId,
    pub is_rgb: bool,
    pub auto_threshold: u32,
    pub calibration: Calibration,
    pub range: DisplayRange,
}

/// Pointer position captured at press time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragSession {
    pub last_x: i32,
    pub last_y: i32,
}

#[derive(Debug, Default)]
pub struct WindowLevelTool {
    session: Option<ImageSession>,
    drag: Option<DragSession>,
    menu_is_ct: Option<bool>,
}

impl WindowLevelTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session(&self) -> Option<&ImageSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    /// Make `image` the active one, rebuilding the session if its identity changed
    ///
    /// Image type and display range are re-read on every activation; calibration
    /// and auto sensitivity survive only while the image stays the same.
    fn activate<H: ImageHost + ?Sized>(&mut self, image: &mut H) -> &mut ImageSession {
        let id = image.id();
        let session = match self.session.take() {
            Some(session) if session.image == id => self.session.insert(session),
            _ => {
                let calibration = extract_calibration(image);
                debug!("new session for image {id} (ct={})", calibration.is_ct);
                if image.kind().is_rgb() {
                    image.snapshot();
                }
                self.session.insert(ImageSession {
                    image: id,
                    is_rgb: false,
                    auto_threshold: 0,
                    calibration,
                    range: DisplayRange::default(),
                })
            }
        };

        session.is_rgb = image.kind().is_rgb();
        session.range = image.display_range();
        session
    }

    /// Pointer press: capture pointer position and current display range
    pub fn pointer_pressed<H: ImageHost + ?Sized>(&mut self, image: &mut H, x: i32, y: i32) {
        self.activate(image);
        self.drag = Some(DragSession { last_x: x, last_y: y });
    }

    /// Pointer drag: horizontal motion changes the window, vertical the level
    ///
    /// Deltas are measured from the press position, not the previous drag event.
    pub fn pointer_dragged<H: ImageHost + ?Sized>(&mut self, image: &mut H, x: i32, y: i32) -> Option<DisplayRange> {
        let drag = self.drag?;
        let session = self.session.as_ref()?;
        if session.image != image.id() {
            return None;
        }

        let span = session.range.window();
        let dims = image.dimensions();
        let magnification = image.magnification();
        let total_width = (f64::from(dims.width) * magnification) as i64;
        let total_height = (f64::from(dims.height) * magnification) as i64;

        let x_ratio = ratio(i64::from(x) - i64::from(drag.last_x), total_width);
        let y_ratio = ratio(i64::from(y) - i64::from(drag.last_y), total_height);

        // Dragging right narrows the window
        let window_delta = -span * x_ratio;
        let level_delta = span * y_ratio;

        self.adjust_window_level(image, window_delta, level_delta)
    }

    /// Apply window/level deltas to the session range and push the result to the host
    ///
    /// Window and level are clamped at zero. The session range itself is left
    /// untouched so successive drags stay relative to the press-time range.
    pub fn adjust_window_level<H: ImageHost + ?Sized>(
        &mut self,
        image: &mut H,
        window_delta: f64,
        level_delta: f64,
    ) -> Option<DisplayRange> {
        let session = self.session.as_ref()?;

        let window = (session.range.window() + window_delta).max(0.0);
        let level = (session.range.level() + level_delta).max(0.0);

        let (print_window, print_level) = session.calibration.to_calibrated(window, level);
        image.show_status(&status_text(print_window, print_level));

        let range = DisplayRange::from_window_level(window, level);
        image.set_display_range(range);
        image.redraw(session.is_rgb);
        Some(range)
    }

    /// Histogram-based auto window; images that are not 16/32-bit are reset instead
    pub fn auto<H: ImageHost + ?Sized>(&mut self, image: &mut H) -> Option<DisplayRange> {
        if !image.is_visible() {
            return None;
        }
        let depth = image.bit_depth();
        if depth != 16 && depth != 32 {
            debug!("auto on {depth}-bit image {} falls back to reset", image.id());
            return self.reset(image);
        }

        let session = self.activate(image);
        let stats = image.uncalibrated_statistics();
        session.auto_threshold = next_threshold(session.auto_threshold);
        session.range = auto_range(&stats, session.auto_threshold)?;

        self.adjust_window_level(image, 0.0, 0.0)
    }

    /// Restore the host's default display range
    pub fn reset<H: ImageHost + ?Sized>(&mut self, image: &mut H) -> Option<DisplayRange> {
        if !image.is_visible() {
            return None;
        }
        let session = self.activate(image);
        image.reset_display_range();
        session.range = image.display_range();
        session.auto_threshold = 0;

        if session.is_rgb {
            image.restore_snapshot();
            let range = DisplayRange::new(0.0, 255.0);
            session.range = range;
            image.set_display_range(range);
            image.redraw(true);
            Some(range)
        } else {
            self.adjust_window_level(image, 0.0, 0.0)
        }
    }

    /// Apply a named CT preset through the image calibration; unknown names do nothing
    pub fn apply_preset<H: ImageHost + ?Sized>(&mut self, image: &mut H, name: &str) -> Option<DisplayRange> {
        if !image.is_visible() {
            return None;
        }
        let session = self.activate(image);
        session.auto_threshold = 0;

        let Some(preset) = find_preset(name) else {
            debug!("unknown preset {name:?}");
            return None;
        };

        let range = preset.to_display_range(&session.calibration);
        session.range = range;
        image.set_display_range(range);
        image.redraw(false);
        Some(range)
    }

    /// Dispatch a menu command
    pub fn run<H: ImageHost + ?Sized>(&mut self, image: &mut H, command: &Command) -> Option<DisplayRange> {
        match command {
            Command::Auto => self.auto(image),
            Command::Reset => self.reset(image),
            Command::Preset(name) => self.apply_preset(image, name),
        }
    }

    /// Menu for the active image; `rebuild` is set when the CT status changed
    pub fn menu<H: ImageHost + ?Sized>(&mut self, image: &mut H) -> MenuLayout {
        let is_ct = self.activate(image).calibration.is_ct;
        let layout = menu::layout(self.menu_is_ct, is_ct);
        self.menu_is_ct = Some(is_ct);
        layout
    }
}

fn ratio(delta: i64, total: i64) -> f64 {
    if total > 0 {
        delta as f64 / total as f64
    } else {
        0.0
    }
}

fn status_text(window: f64, level: f64) -> String {
    format!("Window: {window:.2}, Level: {level:.2}")
}
