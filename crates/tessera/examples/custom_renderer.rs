//! Example: Plugging a custom diagram renderer into the pipeline
//!
//! This example wraps the bundled SVG renderer so that every render is
//! logged to stdout, renders one of the canned responses and prints the
//! plain-text view before and after the diagrams finish.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;

use tessera::{
    MessageRenderer,
    config::{AppConfig, Theme},
    diagram::{DiagramError, DiagramRenderer, RenderedDiagram, SvgDiagramRenderer},
    export::{Exporter, TextExporter},
    responder::CannedResponder,
};

/// Times every render of the wrapped renderer.
struct TimedRenderer {
    inner: SvgDiagramRenderer,
}

#[async_trait]
impl DiagramRenderer for TimedRenderer {
    fn name(&self) -> &'static str {
        "timed-svg"
    }

    async fn render(&self, source: &str) -> Result<RenderedDiagram, DiagramError> {
        let started = Instant::now();
        let result = self.inner.render(source).await;
        println!(
            "rendered {} line(s) in {:?}: {}",
            source.lines().count(),
            started.elapsed(),
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let renderer = MessageRenderer::new(AppConfig::default()).with_diagram_renderer(Arc::new(
        TimedRenderer {
            inner: SvgDiagramRenderer::new(Theme::Dark),
        },
    ));
    let exporter = TextExporter::new(renderer.config());

    let response = CannedResponder::new().respond("draw me a flowchart");
    let mut message = renderer.render(&response);

    println!("--- before resolve ---\n{}", exporter.export(&message)?);
    message.resolve().await;
    println!("--- after resolve ---\n{}", exporter.export(&message)?);

    Ok(())
}
