//! Context menu of the window/level tool
//!
//! The menu is computed on demand from the CT status of the previous and the
//! current image instead of being kept as mutable widget state.

use crate::window::{CT_PRESETS, find_preset};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Auto,
    Reset,
    /// Preset name; unknown names are accepted and ignored when run
    Preset(String),
}

impl FromStr for Command {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Auto" => Self::Auto,
            "Reset" => Self::Reset,
            other => Self::Preset(other.to_string()),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Reset => write!(f, "Reset"),
            Self::Preset(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Command(Command),
    Separator,
}

impl fmt::Display for MenuItem {
    /// Presets are listed with their calibrated window
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(Command::Preset(name)) => match find_preset(name) {
                Some(preset) => write!(f, "{preset}"),
                None => write!(f, "{name}"),
            },
            Self::Command(command) => write!(f, "{command}"),
            Self::Separator => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLayout {
    /// Set when a previously shown menu must be discarded and rebuilt
    pub rebuild: bool,
    pub items: Vec<MenuItem>,
}

impl MenuLayout {
    /// Labels of the selectable entries, in display order
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.items.iter().filter_map(|item| match item {
            MenuItem::Command(command) => Some(command.to_string()),
            MenuItem::Separator => None,
        })
    }
}

/// Layout for an image with CT status `current_is_ct`
///
/// `previous_is_ct` is `None` before any menu was built.
#[must_use]
pub fn layout(previous_is_ct: Option<bool>, current_is_ct: bool) -> MenuLayout {
    let mut items = vec![
        MenuItem::Command(Command::Auto),
        MenuItem::Command(Command::Reset),
        MenuItem::Separator,
    ];
    items.extend(
        CT_PRESETS
            .iter()
            .map(|preset| MenuItem::Command(Command::Preset(preset.name.to_string()))),
    );

    MenuLayout {
        rebuild: previous_is_ct != Some(current_is_ct),
        items,
    }
}
