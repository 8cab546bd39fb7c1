//! Self-contained HTML export.

use std::fmt::Write;

use log::{debug, info};

use super::{Exporter, write_error};
use crate::{
    TesseraError,
    config::{AppConfig, Palette},
    highlight::{HighlightedCode, TokenClass},
    render::{Block, DiagramSlot, DiagramState, RenderedMessage},
};

/// Writes a rendered message as a single HTML page with inline styles and
/// inline SVG diagrams.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    palette: Palette,
    background: String,
    line_numbers: bool,
    title: String,
}

impl HtmlExporter {
    /// Create an exporter styled by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Config`] if the configured background color is
    /// not a valid CSS color.
    pub fn new(config: &AppConfig) -> Result<Self, TesseraError> {
        let palette = config.style().theme().palette();
        let background = config
            .style()
            .background_color()
            .map_err(TesseraError::Config)?
            .map_or_else(|| palette.background.to_string(), |color| color.to_string());

        Ok(Self {
            palette,
            background,
            line_numbers: config.render().line_numbers(),
            title: "Assistant message".to_string(),
        })
    }

    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn stylesheet(&self) -> String {
        let p = &self.palette;
        format!(
            "body {{ margin: 0; background: {background}; color: {fg}; \
             font-family: ui-sans-serif, system-ui, sans-serif; line-height: 1.5; }}
main {{ max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}
.text {{ white-space: pre-wrap; margin: 1rem 0; }}
figure {{ margin: 1rem 0; border: 1px solid {border}; border-radius: 6px; overflow: auto; }}
figcaption {{ padding: 0.25rem 0.75rem; border-bottom: 1px solid {border}; color: {muted}; font-size: 0.8rem; }}
pre {{ margin: 0; padding: 0.75rem; background: {code_bg}; \
             font-family: ui-monospace, monospace; font-size: 0.875rem; }}
.line {{ display: block; }}
.ln {{ display: inline-block; width: 2.5em; margin-right: 1em; text-align: right; color: {muted}; user-select: none; }}
.tok-kw {{ color: {keyword}; font-weight: 600; }}
.tok-str {{ color: {string}; }}
.tok-com {{ color: {comment}; font-style: italic; }}
.tok-num {{ color: {number}; }}
.diagram {{ padding: 0.75rem; text-align: center; }}
.diagram-pending {{ padding: 1rem; color: {muted}; }}
.diagram-error {{ padding: 0.75rem; border: 1px solid {error}; border-radius: 6px; margin: 1rem 0; }}
.diagram-error .reason {{ color: {error}; }}",
            background = self.background,
            fg = p.foreground,
            border = p.border,
            muted = p.muted,
            code_bg = p.code_background,
            keyword = p.keyword,
            string = p.string,
            comment = p.comment,
            number = p.number,
            error = p.error,
        )
    }

    fn write_code(&self, out: &mut String, code: &HighlightedCode) -> std::fmt::Result {
        let language = escape(code.language());
        writeln!(out, "<figure class=\"code\" data-language=\"{language}\">")?;
        writeln!(out, "<figcaption>{language}</figcaption>")?;
        out.push_str("<pre><code>");
        for (number, line) in code.lines().iter().enumerate() {
            out.push_str("<span class=\"line\">");
            if self.line_numbers {
                write!(out, "<span class=\"ln\">{}</span>", number + 1)?;
            }
            for token in line {
                match token.class() {
                    TokenClass::Plain => out.push_str(&escape(token.text())),
                    class => write!(
                        out,
                        "<span class=\"{}\">{}</span>",
                        class.css_class(),
                        escape(token.text())
                    )?,
                }
            }
            out.push_str("</span>\n");
        }
        writeln!(out, "</code></pre>\n</figure>")
    }
}

fn write_diagram(out: &mut String, slot: &DiagramSlot) -> std::fmt::Result {
    match slot.state() {
        DiagramState::Ready(diagram) => {
            writeln!(out, "<figure class=\"diagram\">\n{}\n</figure>", diagram.svg())
        }
        DiagramState::Pending => writeln!(
            out,
            "<div class=\"diagram-pending\">Rendering diagram\u{2026}</div>"
        ),
        DiagramState::Failed { message } => writeln!(
            out,
            "<div class=\"diagram-error\">\n<p>Could not render diagram</p>\n\
             <p class=\"reason\">{}</p>\n<pre><code>{}</code></pre>\n</div>",
            escape(message),
            escape(slot.source())
        ),
    }
}

impl Exporter for HtmlExporter {
    fn export(&self, message: &RenderedMessage) -> Result<String, TesseraError> {
        info!(blocks = message.blocks().len(); "Exporting message as HTML");

        let mut out = String::new();
        write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n<main>\n",
            escape(&self.title),
            self.stylesheet()
        )
        .map_err(write_error)?;

        for block in message.blocks() {
            let written = match block {
                Block::Text(text) => {
                    writeln!(out, "<div class=\"text\">{}</div>", escape(text))
                }
                Block::Code(code) => self.write_code(&mut out, code),
                Block::Diagram(slot) => write_diagram(&mut out, slot),
            };
            written.map_err(write_error)?;
        }

        out.push_str("</main>\n</body>\n</html>\n");
        debug!(bytes = out.len(); "HTML written");
        Ok(out)
    }
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use crate::{
        MessageRenderer,
        config::{RenderConfig, SegmentsConfig, StyleConfig, Theme},
    };

    use super::*;

    fn config(style: StyleConfig, render: RenderConfig) -> AppConfig {
        AppConfig::new(SegmentsConfig::default(), render, style)
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_invalid_background_is_config_error() {
        let style = StyleConfig::default().with_background_color("nope");
        let err = HtmlExporter::new(&config(style, RenderConfig::default())).unwrap_err();
        assert!(matches!(err, TesseraError::Config(_)));
    }

    #[tokio::test]
    async fn test_export_blocks() {
        let renderer = MessageRenderer::default();
        let mut message = renderer.render(
            "Use <this>:\n```rust\nfn main() {}\n```\n```mermaid\nflowchart LR\nA --> B\n```",
        );
        message.resolve().await;

        let html = HtmlExporter::new(renderer.config())
            .unwrap()
            .export(&message)
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"text\">Use &lt;this&gt;:</div>"));
        assert!(html.contains("<figcaption>rust</figcaption>"));
        assert!(html.contains("<span class=\"line\"><span class=\"ln\">1</span>"));
        assert!(html.contains("<span class=\"tok-kw\">fn</span>"));
        assert!(html.contains("<figure class=\"diagram\">"));
        assert!(html.contains("<svg"));
    }

    #[tokio::test]
    async fn test_failed_diagram_placeholder() {
        let renderer = MessageRenderer::default();
        let mut message = renderer.render("```mermaid\npie title <Pets>\n```");
        message.resolve().await;

        let html = HtmlExporter::new(renderer.config())
            .unwrap()
            .with_line_numbers(false)
            .export(&message)
            .unwrap();

        assert!(html.contains("<div class=\"diagram-error\">"));
        assert!(html.contains("pie title &lt;Pets&gt;"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_theme_and_line_numbers_from_config() {
        let config = config(
            StyleConfig::default().with_theme(Theme::Dark),
            RenderConfig::default().with_line_numbers(false),
        );
        let renderer = MessageRenderer::new(config);
        let message = renderer.render("```python\nx = 1\n```");

        let html = HtmlExporter::new(renderer.config())
            .unwrap()
            .export(&message)
            .unwrap();

        assert!(html.contains(Theme::Dark.palette().background));
        assert!(!html.contains("class=\"ln\""));
        assert!(html.contains("<span class=\"tok-num\">1</span>"));
    }
}
