//! Plain-text export.
//!
//! Code and diagram blocks are written back as fenced blocks. Each diagram
//! fence is followed by a one-line status such as `[diagram: rendered]`.

use std::fmt::Write;

use log::info;

use tessera_core::segment::FENCE;

use super::{Exporter, write_error};
use crate::{
    TesseraError,
    config::AppConfig,
    render::{Block, DiagramState, RenderedMessage},
};

/// Writes a rendered message as plain text.
#[derive(Debug, Clone)]
pub struct TextExporter {
    diagram_language: String,
}

impl TextExporter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            diagram_language: config.segments().diagram_language().to_string(),
        }
    }
}

fn status(state: &DiagramState) -> String {
    match state {
        DiagramState::Pending => "[diagram: pending]".to_string(),
        DiagramState::Ready(_) => "[diagram: rendered]".to_string(),
        DiagramState::Failed { message } => {
            let reason = message.lines().next().unwrap_or_default();
            format!("[diagram: could not render: {reason}]")
        }
    }
}

impl Exporter for TextExporter {
    fn export(&self, message: &RenderedMessage) -> Result<String, TesseraError> {
        info!(blocks = message.blocks().len(); "Exporting message as text");

        let mut parts = Vec::with_capacity(message.blocks().len());
        for block in message.blocks() {
            let mut part = String::new();
            let written = match block {
                Block::Text(text) => write!(part, "{text}"),
                Block::Code(code) => write!(
                    part,
                    "{FENCE}{}\n{}\n{FENCE}",
                    code.language(),
                    code.to_plain_text()
                ),
                Block::Diagram(slot) => write!(
                    part,
                    "{FENCE}{}\n{}\n{FENCE}\n{}",
                    self.diagram_language,
                    slot.source(),
                    status(slot.state())
                ),
            };
            written.map_err(write_error)?;
            parts.push(part);
        }

        let mut out = parts.join("\n\n");
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::MessageRenderer;

    use super::*;

    #[tokio::test]
    async fn test_export_text() {
        let renderer = MessageRenderer::default();
        let mut message = renderer.render(
            "Intro\n\n```\nplain code\n```\n```mermaid\ngraph LR\nA --> B\n```\n```mermaid\nnot a diagram\n```\nOutro",
        );
        message.resolve().await;

        let text = TextExporter::new(renderer.config()).export(&message).unwrap();

        assert_eq!(
            text,
            "Intro\n\n\
             ```text\nplain code\n```\n\n\
             ```mermaid\ngraph LR\nA --> B\n```\n[diagram: rendered]\n\n\
             ```mermaid\nnot a diagram\n```\n[diagram: could not render: error[E101]: unsupported diagram type `not`]\n\n\
             Outro\n"
        );
    }

    #[tokio::test]
    async fn test_pending_status() {
        let renderer = MessageRenderer::default();
        let mut message = renderer.render("```mermaid\ngraph\nA --> B\n```");
        message.cancel();

        let text = TextExporter::new(renderer.config()).export(&message).unwrap();
        assert!(text.ends_with("[diagram: pending]\n"));
    }
}
