//! Diagram renderer adapter.
//!
//! A diagram block's description is turned into an image by a
//! [`DiagramRenderer`]. Rendering is asynchronous and may fail; the message
//! pipeline runs one render per diagram block and turns a failure into an
//! inline placeholder, so a renderer never has to recover on its own.
//!
//! [`SvgDiagramRenderer`] is the bundled implementation. It parses the
//! description with [`tessera_parser::parse_diagram`], places elements with
//! a simple ranked layout and draws them as SVG.

mod draw;
mod layout;

use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;

use tessera_core::{color::Color, diagram::Diagram};
use tessera_parser::{error::ParseError, parse_diagram};

use crate::config::Theme;

/// An image produced from a diagram description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    svg: String,
}

impl RenderedDiagram {
    pub fn new(svg: impl Into<String>) -> Self {
        Self { svg: svg.into() }
    }

    /// The image as an SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }
}

/// Why a diagram could not be rendered.
#[derive(Debug, Clone, Error)]
pub enum DiagramError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Render error: {0}")]
    Render(String),
}

/// Turns diagram descriptions into images.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Renderer name for logging.
    fn name(&self) -> &'static str;

    /// Render one diagram description.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError`] if the description is invalid or cannot be
    /// drawn.
    async fn render(&self, source: &str) -> Result<RenderedDiagram, DiagramError>;
}

/// Renders flowcharts and sequence diagrams to SVG.
#[derive(Debug, Clone, Default)]
pub struct SvgDiagramRenderer {
    theme: Theme,
    /// Overrides the theme's background when set.
    background: Option<Color>,
}

impl SvgDiagramRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Draw an already parsed diagram.
    pub fn render_diagram(&self, diagram: &Diagram) -> RenderedDiagram {
        info!(diagram_kind:? = diagram.kind(); "Drawing diagram");
        let style = draw::Style::new(self.theme.palette(), self.background.as_ref());
        let document = match diagram {
            Diagram::Flowchart(chart) => {
                let placed = layout::layout_flowchart(chart);
                draw::flowchart_document(&placed, &style)
            }
            Diagram::Sequence(sequence) => {
                let placed = layout::layout_sequence(sequence);
                draw::sequence_document(&placed, &style)
            }
        };
        RenderedDiagram::new(document.to_string())
    }
}

#[async_trait]
impl DiagramRenderer for SvgDiagramRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    async fn render(&self, source: &str) -> Result<RenderedDiagram, DiagramError> {
        let diagram = parse_diagram(source)?;
        let rendered = self.render_diagram(&diagram);
        debug!(svg_len = rendered.svg().len(); "Diagram rendered");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use tessera_parser::error::ErrorCode;

    use super::*;

    #[tokio::test]
    async fn test_render_flowchart() {
        let rendered = SvgDiagramRenderer::default()
            .render("flowchart LR\nA[Start] --> B{Ok?}\nB -->|yes| C((Done))")
            .await
            .unwrap();

        let svg = rendered.svg();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Start"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("url(#arrow)"));
    }

    #[tokio::test]
    async fn test_render_sequence() {
        let rendered = SvgDiagramRenderer::new(Theme::Dark)
            .render("sequenceDiagram\nClient->>Server: GET /\nServer-->>Client: 200")
            .await
            .unwrap();

        let svg = rendered.svg();
        assert!(svg.contains("Client"));
        assert!(svg.contains("GET /"));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(Theme::Dark.palette().background));
    }

    #[tokio::test]
    async fn test_background_override() {
        let color = Color::new("#123456").unwrap();
        let rendered = SvgDiagramRenderer::default()
            .with_background(color.clone())
            .render("graph\nA --> B")
            .await
            .unwrap();

        assert!(rendered.svg().contains(&color.to_string()));
        assert!(!rendered.svg().contains(Theme::Light.palette().background));
    }

    #[tokio::test]
    async fn test_render_invalid_description() {
        let err = SvgDiagramRenderer::default()
            .render("pie title Pets")
            .await
            .unwrap_err();

        let DiagramError::Parse(parse_error) = err else {
            panic!("expected parse error");
        };
        assert_eq!(parse_error.diagnostics()[0].code(), Some(ErrorCode::E101));
    }
}
