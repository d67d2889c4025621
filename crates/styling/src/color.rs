use std::fmt;

/// CSS named colors used by the building styles.
///
/// `Display` yields the CSS name; [`NamedColor::expression`] yields the
/// styling-language form `color('name')`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum NamedColor {
    #[default]
    White,
    Gold,
    Purple,
    Violet,
    DeepSkyBlue,
    Chartreuse,
    Tomato,
    SkyBlue,
    IndianRed,
    Green,
    DodgerBlue,
    Yellow,
    Fuchsia,
}

impl NamedColor {
    pub const fn css_name(self) -> &'static str {
        match self {
            NamedColor::White => "white",
            NamedColor::Gold => "gold",
            NamedColor::Purple => "purple",
            NamedColor::Violet => "violet",
            NamedColor::DeepSkyBlue => "deepskyblue",
            NamedColor::Chartreuse => "chartreuse",
            NamedColor::Tomato => "tomato",
            NamedColor::SkyBlue => "skyblue",
            NamedColor::IndianRed => "indianred",
            NamedColor::Green => "green",
            NamedColor::DodgerBlue => "dodgerblue",
            NamedColor::Yellow => "yellow",
            NamedColor::Fuchsia => "fuchsia",
        }
    }

    pub const fn rgb8(self) -> [u8; 3] {
        match self {
            NamedColor::White => [255, 255, 255],
            NamedColor::Gold => [255, 215, 0],
            NamedColor::Purple => [128, 0, 128],
            NamedColor::Violet => [238, 130, 238],
            NamedColor::DeepSkyBlue => [0, 191, 255],
            NamedColor::Chartreuse => [127, 255, 0],
            NamedColor::Tomato => [255, 99, 71],
            NamedColor::SkyBlue => [135, 206, 235],
            NamedColor::IndianRed => [205, 92, 92],
            NamedColor::Green => [0, 128, 0],
            NamedColor::DodgerBlue => [30, 144, 255],
            NamedColor::Yellow => [255, 255, 0],
            NamedColor::Fuchsia => [255, 0, 255],
        }
    }

    /// `#rrggbb`, for tools that don't know CSS color keywords.
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn expression(self) -> String {
        format!("color('{}')", self.css_name())
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

#[cfg(test)]
mod tests {
    use super::NamedColor;

    #[test]
    fn expression_wraps_css_name() {
        assert_eq!(NamedColor::DeepSkyBlue.expression(), "color('deepskyblue')");
        assert_eq!(NamedColor::default(), NamedColor::White);
    }

    #[test]
    fn hex_matches_css_keyword() {
        assert_eq!(NamedColor::Gold.hex(), "#ffd700");
        assert_eq!(NamedColor::DodgerBlue.hex(), "#1e90ff");
    }
}
