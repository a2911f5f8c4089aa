//! Enumeration types for the gridfleet simulation.

use serde::{Deserialize, Serialize};

/// Display color of an agent marker on the rendered grid.
///
/// Scenario files carry colors as free-form strings. Known names map to
/// the named variants; anything else is kept verbatim in
/// [`Color::Unrecognized`] and renders without a color escape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    /// Bright red.
    Red,
    /// Bright green.
    Green,
    /// Bright yellow.
    Yellow,
    /// Bright blue.
    Blue,
    /// Bright magenta.
    Magenta,
    /// Bright cyan.
    Cyan,
    /// Bright white.
    White,
    /// A color name with no terminal mapping.
    Unrecognized(String),
}

impl Color {
    /// The fixed palette the fleet generator draws from.
    pub const PALETTE: [Self; 7] = [
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Parse a color name. Matching is case-insensitive; unknown names
    /// become [`Color::Unrecognized`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            _ => Self::Unrecognized(name.to_owned()),
        }
    }

    /// Return the color's name as it appears in scenario files.
    pub fn name(&self) -> &str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Unrecognized(name) => name,
        }
    }

    /// Whether this color has a terminal mapping.
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Color {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        match color {
            Color::Unrecognized(name) => name,
            known => known.name().to_owned(),
        }
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
