//! CSS color values used by rendering themes.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color such as `#1e1e2e`, `rgb(255, 0, 0)` or `white`.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parse a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending string if it is not a valid
    /// CSS color.
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("Invalid color '{color_str}': {err}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        svg::node::Value::from(color.to_string())
    }
}
