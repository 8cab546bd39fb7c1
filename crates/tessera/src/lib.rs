//! Tessera - render assistant messages that mix prose, code and diagrams.
//!
//! A message is split into plain text, code blocks and diagram blocks. Code
//! is highlighted right away; diagrams are rendered in the background and
//! fill in their place in the message as they finish. A diagram that cannot
//! be rendered becomes an inline placeholder, never an error.

pub mod config;
pub mod diagram;
pub mod export;
pub mod highlight;
pub mod render;
pub mod responder;

mod error;

pub use tessera_core::{Segment, SegmentKind, Span};
pub use tessera_parser::error::Diagnostic;

pub use error::TesseraError;

use std::sync::Arc;

use log::{debug, info, warn};

use tessera_parser::{Extraction, extract, parse_diagram};

use config::AppConfig;
use diagram::{DiagramRenderer, SvgDiagramRenderer};
use highlight::{CodeHighlighter, SyntectHighlighter};
use render::RenderedMessage;

/// Builder for segmenting and rendering assistant messages.
///
/// # Examples
///
/// ```rust,no_run
/// use tessera::{MessageRenderer, config::AppConfig};
///
/// # async fn run() {
/// let renderer = MessageRenderer::new(AppConfig::default());
///
/// let mut message = renderer.render("Steps:\n```mermaid\nflowchart LR\nA --> B\n```");
/// message.resolve().await;
/// assert!(message.is_resolved());
/// # }
/// ```
pub struct MessageRenderer {
    config: AppConfig,
    highlighter: Box<dyn CodeHighlighter>,
    diagram_renderer: Arc<dyn DiagramRenderer>,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl MessageRenderer {
    /// Create a renderer with the syntect highlighter and the bundled SVG
    /// diagram renderer, styled by `config`.
    ///
    /// An invalid background color in `config` is logged and ignored here;
    /// exporters report it as an error.
    pub fn new(config: AppConfig) -> Self {
        let mut svg_renderer = SvgDiagramRenderer::new(config.style().theme());
        match config.style().background_color() {
            Ok(Some(color)) => svg_renderer = svg_renderer.with_background(color),
            Ok(None) => {}
            Err(err) => warn!(err:%; "Ignoring diagram background"),
        }

        Self {
            config,
            highlighter: Box::new(SyntectHighlighter::new()),
            diagram_renderer: Arc::new(svg_renderer),
        }
    }

    /// Replace the code highlighter.
    pub fn with_highlighter(mut self, highlighter: impl CodeHighlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Replace the diagram renderer.
    pub fn with_diagram_renderer(mut self, renderer: Arc<dyn DiagramRenderer>) -> Self {
        self.diagram_renderer = renderer;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Split `message` into segments.
    pub fn segments(&self, message: &str) -> Extraction {
        extract(message, &self.config.segments().to_extract_config())
    }

    /// Render `message` into blocks.
    ///
    /// Text and code blocks are complete on return. Every diagram block is
    /// pending and rendering in the background; see
    /// [`RenderedMessage::resolve`]. Called outside of a tokio runtime, the
    /// diagram blocks come back failed instead.
    pub fn render(&self, message: &str) -> RenderedMessage {
        let (segments, diagnostics) = self.segments(message).into_parts();
        info!(
            segments = segments.len(),
            renderer = self.diagram_renderer.name();
            "Rendering message"
        );

        let timeout = self.config.render().diagram_timeout();
        let default_language = self.config.segments().default_language();
        let mut rendered = RenderedMessage::new(diagnostics);
        for segment in &segments {
            match segment.kind() {
                SegmentKind::PlainText => rendered.push_text(segment.display_text()),
                SegmentKind::CodeBlock => {
                    let language = segment.language().unwrap_or(default_language);
                    rendered.push_code(self.highlighter.highlight(segment.payload(), language));
                }
                SegmentKind::DiagramBlock => rendered.push_diagram(
                    segment.payload(),
                    Arc::clone(&self.diagram_renderer),
                    timeout,
                ),
            }
        }

        debug!(pending = rendered.pending_count(); "Message rendered");
        rendered
    }

    /// Parse every diagram block of `message` without rendering it.
    ///
    /// Returns the extraction warnings when all diagram blocks are valid.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Diagram`] for the first diagram block that
    /// does not parse, carrying that block's description as source.
    pub fn check(&self, message: &str) -> Result<Vec<Diagnostic>, TesseraError> {
        let (segments, diagnostics) = self.segments(message).into_parts();

        for segment in segments.iter().filter(|segment| segment.is_diagram_block()) {
            parse_diagram(segment.payload())
                .map_err(|err| TesseraError::new_diagram_error(err, segment.payload()))?;
        }

        info!(warnings = diagnostics.len(); "Message checked");
        Ok(diagnostics)
    }
}
