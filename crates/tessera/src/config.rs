//! Configuration types for Tessera message rendering.
//!
//! This module provides configuration structures that control how messages
//! are segmented, rendered and styled. All types implement
//! [`serde::Deserialize`] so they can be loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`SegmentsConfig`] - Fence info strings used during extraction.
//! - [`RenderConfig`] - Line numbers and diagram render timeout.
//! - [`StyleConfig`] - Theme and background color of exported views.
//!
//! # Example
//!
//! ```
//! # use tessera::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.segments().diagram_language(), "mermaid");
//! assert!(config.style().background_color().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use tessera_core::{
    color::Color,
    segment::{DEFAULT_DIAGRAM_LANGUAGE, DEFAULT_LANGUAGE},
};
use tessera_parser::ExtractConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Segment extraction section.
    #[serde(default)]
    segments: SegmentsConfig,

    /// Rendering section.
    #[serde(default)]
    render: RenderConfig,

    /// Style section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `segments` - Fence info strings used during extraction.
    /// * `render` - Rendering options.
    /// * `style` - Visual styling options.
    pub fn new(segments: SegmentsConfig, render: RenderConfig, style: StyleConfig) -> Self {
        Self {
            segments,
            render,
            style,
        }
    }

    pub fn segments(&self) -> &SegmentsConfig {
        &self.segments
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Info strings that drive segment classification.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    /// Info string that marks a diagram block.
    diagram_language: String,

    /// Language reported for code blocks without an info string.
    default_language: String,
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SegmentsConfig {
    pub fn diagram_language(&self) -> &str {
        &self.diagram_language
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns the matching extractor configuration.
    pub fn to_extract_config(&self) -> ExtractConfig {
        ExtractConfig::new(&self.diagram_language, &self.default_language)
    }
}

/// Options for rendering code and diagram blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Show line numbers next to code blocks.
    line_numbers: bool,

    /// Upper bound for a single diagram render, in milliseconds. `0` disables it.
    diagram_timeout_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            diagram_timeout_ms: 5000,
        }
    }
}

impl RenderConfig {
    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    pub fn with_diagram_timeout_ms(mut self, diagram_timeout_ms: u64) -> Self {
        self.diagram_timeout_ms = diagram_timeout_ms;
        self
    }

    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    /// Returns the diagram render timeout, or `None` if renders may take
    /// as long as they need.
    pub fn diagram_timeout(&self) -> Option<Duration> {
        (self.diagram_timeout_ms > 0).then(|| Duration::from_millis(self.diagram_timeout_ms))
    }
}

/// Light or dark presentation of exported views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// CSS colors used by a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
    pub code_background: &'static str,
    pub keyword: &'static str,
    pub string: &'static str,
    pub comment: &'static str,
    pub number: &'static str,
    pub error: &'static str,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#ffffff",
                foreground: "#1f2328",
                muted: "#656d76",
                border: "#d0d7de",
                code_background: "#f6f8fa",
                keyword: "#cf222e",
                string: "#0a3069",
                comment: "#6e7781",
                number: "#0550ae",
                error: "#cf222e",
            },
            Theme::Dark => Palette {
                background: "#0d1117",
                foreground: "#e6edf3",
                muted: "#8d96a0",
                border: "#30363d",
                code_background: "#161b22",
                keyword: "#ff7b72",
                string: "#a5d6ff",
                comment: "#8b949e",
                number: "#79c0ff",
                error: "#f85149",
            },
        }
    }
}

/// Visual styling configuration for exported views.
///
/// Fields that are not set fall back to the theme's defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    theme: Theme,

    /// Page background [`Color`], as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.segments().default_language(), "text");
        assert!(config.render().line_numbers());
        assert_eq!(
            config.render().diagram_timeout(),
            Some(Duration::from_millis(5000))
        );
        assert_eq!(config.style().theme(), Theme::Light);
        assert!(matches!(config.style().background_color(), Ok(None)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let render = RenderConfig::default().with_diagram_timeout_ms(0);
        assert_eq!(render.diagram_timeout(), None);
    }

    #[test]
    fn test_extract_config_follows_segments() {
        let segments = SegmentsConfig {
            diagram_language: "dot".to_string(),
            default_language: "plaintext".to_string(),
        };
        let extract = segments.to_extract_config();

        assert_eq!(extract.diagram_language(), "dot");
        assert_eq!(extract.default_language(), "plaintext");
    }

    #[test]
    fn test_invalid_background_color() {
        let style = StyleConfig::default().with_background_color("nope");
        let err = style.background_color().unwrap_err();
        assert!(err.starts_with("Invalid background color in config"));
    }

    #[test]
    fn test_dark_palette_differs() {
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }
}
