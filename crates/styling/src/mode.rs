use std::fmt;
use std::str::FromStr;

use crate::error::StyleError;

/// Map-coloring mode, one per entry of the mode dropdown.
///
/// Declaration order is dropdown order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    ByHeight,
    ByDistance,
    ByType,
    HighlightSchool,
    ShowResidential,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::ByHeight,
        DisplayMode::ByDistance,
        DisplayMode::ByType,
        DisplayMode::HighlightSchool,
        DisplayMode::ShowResidential,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            DisplayMode::ByHeight => "by-height",
            DisplayMode::ByDistance => "by-distance",
            DisplayMode::ByType => "by-type",
            DisplayMode::HighlightSchool => "highlight-school",
            DisplayMode::ShowResidential => "show-residential",
        }
    }

    /// Dropdown label.
    pub const fn label(self) -> &'static str {
        match self {
            DisplayMode::ByHeight => "Color by building height",
            DisplayMode::ByDistance => "Color by distance",
            DisplayMode::ByType => "Color by building type",
            DisplayMode::HighlightSchool => "Highlight schools",
            DisplayMode::ShowResidential => "Show residential only",
        }
    }

    /// Whether this mode needs the pick-a-point subscription.
    pub fn uses_picking(self) -> bool {
        self == DisplayMode::ByDistance
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayMode {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| StyleError::UnknownMode(s.to_string()))
    }
}
