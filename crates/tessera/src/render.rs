//! Rendered message views.
//!
//! A [`RenderedMessage`] is the ordered list of [`Block`]s produced from one
//! message. Text and code blocks are complete as soon as the message is
//! rendered. Diagram blocks start out [`DiagramState::Pending`] and are
//! filled in by background tasks, each of which writes only to the slot it
//! was started for, so blocks keep source order no matter which render
//! finishes first.
//!
//! Dropping a rendered message, or calling [`RenderedMessage::cancel`],
//! cancels every render still in flight. Their slots stay pending.

use std::{collections::HashMap, sync::Arc, time::Duration};

use log::{debug, trace, warn};
use tokio::{
    runtime::Handle,
    task::{self, JoinSet},
};
use tokio_util::sync::CancellationToken;

use tessera_parser::error::Diagnostic;

use crate::{
    diagram::{DiagramError, DiagramRenderer, RenderedDiagram},
    highlight::HighlightedCode,
};

/// Progress of one diagram render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramState {
    Pending,
    Ready(RenderedDiagram),
    /// The render failed; the view shows a placeholder instead of the diagram.
    Failed {
        message: String,
    },
}

impl DiagramState {
    pub fn is_pending(&self) -> bool {
        matches!(self, DiagramState::Pending)
    }
}

/// A diagram block together with its render state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSlot {
    source: String,
    state: DiagramState,
}

impl DiagramSlot {
    fn pending(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            state: DiagramState::Pending,
        }
    }

    /// The diagram description as written in the message.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }
}

/// One block of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Prose, with surrounding blank lines removed.
    Text(String),
    Code(HighlightedCode),
    Diagram(DiagramSlot),
}

const NO_RUNTIME: &str = "no async runtime";

type RenderOutcome = Option<Result<RenderedDiagram, DiagramError>>;

/// Blocks of a rendered message plus the diagram renders still in flight.
#[derive(Debug)]
pub struct RenderedMessage {
    blocks: Vec<Block>,
    diagnostics: Vec<Diagnostic>,
    tasks: JoinSet<RenderOutcome>,
    /// Block index written by each task.
    slots: HashMap<task::Id, usize>,
    cancel: CancellationToken,
}

impl RenderedMessage {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            blocks: Vec::new(),
            diagnostics,
            tasks: JoinSet::new(),
            slots: HashMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn push_text(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Text(text.into()));
    }

    pub(crate) fn push_code(&mut self, code: HighlightedCode) {
        self.blocks.push(Block::Code(code));
    }

    /// Add a pending diagram block and start rendering it in the background.
    ///
    /// Outside of a tokio runtime nothing can render it, and the block is
    /// marked failed right away.
    pub(crate) fn push_diagram(
        &mut self,
        source: &str,
        renderer: Arc<dyn DiagramRenderer>,
        timeout: Option<Duration>,
    ) {
        let index = self.blocks.len();
        let Ok(runtime) = Handle::try_current() else {
            warn!(index; "No async runtime, diagram left unrendered");
            self.blocks.push(Block::Diagram(DiagramSlot {
                source: source.to_string(),
                state: DiagramState::Failed {
                    message: NO_RUNTIME.to_string(),
                },
            }));
            return;
        };
        self.blocks.push(Block::Diagram(DiagramSlot::pending(source)));

        let token = self.cancel.child_token();
        let source = source.to_string();
        let render = async move {
            tokio::select! {
                biased;
                () = token.cancelled() => None,
                result = render_with_timeout(renderer.as_ref(), &source, timeout) => Some(result),
            }
        };
        let handle = self.tasks.spawn_on(render, &runtime);
        trace!(index, task_id:% = handle.id(); "Diagram render started");
        self.slots.insert(handle.id(), index);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Warnings raised while splitting the message into segments.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagram blocks still waiting for their render.
    pub fn pending_count(&self) -> usize {
        self.diagram_slots()
            .filter(|slot| slot.state().is_pending())
            .count()
    }

    /// Number of diagram blocks showing the "could not render" placeholder.
    pub fn failed_count(&self) -> usize {
        self.diagram_slots()
            .filter(|slot| matches!(slot.state(), DiagramState::Failed { .. }))
            .count()
    }

    pub fn is_resolved(&self) -> bool {
        self.pending_count() == 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn diagram_slots(&self) -> impl Iterator<Item = &DiagramSlot> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Diagram(slot) => Some(slot),
            Block::Text(_) | Block::Code(_) => None,
        })
    }

    /// Wait for every diagram render still in flight.
    ///
    /// Failures are recorded in their slots as [`DiagramState::Failed`];
    /// this never returns an error. After [`RenderedMessage::cancel`] it
    /// returns without filling any slot.
    pub async fn resolve(&mut self) {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            match joined {
                Ok((id, Some(result))) => self.complete(id, result),
                Ok((id, None)) => trace!(task_id:% = id; "Diagram render cancelled"),
                Err(err) if err.is_cancelled() => {
                    trace!(task_id:% = err.id(); "Diagram render aborted");
                }
                Err(err) => {
                    let id = err.id();
                    self.complete(
                        id,
                        Err(DiagramError::Render("diagram renderer panicked".to_string())),
                    );
                }
            }
        }
        debug!(
            blocks = self.blocks.len(),
            pending = self.pending_count();
            "Message resolved"
        );
    }

    /// Cancel every diagram render still in flight.
    ///
    /// Pending slots stay [`DiagramState::Pending`] and no late result is
    /// written to them.
    pub fn cancel(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        debug!(in_flight = self.tasks.len(); "Cancelling diagram renders");
        self.cancel.cancel();
        self.tasks.abort_all();
    }

    fn complete(&mut self, id: task::Id, result: Result<RenderedDiagram, DiagramError>) {
        if self.cancel.is_cancelled() {
            return;
        }
        let Some(index) = self.slots.remove(&id) else {
            return;
        };
        let Some(Block::Diagram(slot)) = self.blocks.get_mut(index) else {
            return;
        };

        slot.state = match result {
            Ok(diagram) => {
                trace!(index; "Diagram ready");
                DiagramState::Ready(diagram)
            }
            Err(err) => {
                warn!(index, err:%; "Diagram could not be rendered");
                DiagramState::Failed {
                    message: err.to_string(),
                }
            }
        };
    }
}

impl Drop for RenderedMessage {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn render_with_timeout(
    renderer: &dyn DiagramRenderer,
    source: &str,
    timeout: Option<Duration>,
) -> Result<RenderedDiagram, DiagramError> {
    let Some(limit) = timeout else {
        return renderer.render(source).await;
    };
    tokio::time::timeout(limit, renderer.render(source))
        .await
        .map_err(|_| {
            DiagramError::Render(format!(
                "{} renderer timed out after {} ms",
                renderer.name(),
                limit.as_millis()
            ))
        })?
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Renders after a delay taken from the description, failing on `fail`.
    struct SlowRenderer;

    #[async_trait]
    impl DiagramRenderer for SlowRenderer {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn render(&self, source: &str) -> Result<RenderedDiagram, DiagramError> {
            if source == "fail" {
                return Err(DiagramError::Render("boom".to_string()));
            }
            let millis = source.parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(RenderedDiagram::new(format!("<svg>{source}</svg>")))
        }
    }

    fn message_with(sources: &[&str], timeout: Option<Duration>) -> RenderedMessage {
        let renderer: Arc<dyn DiagramRenderer> = Arc::new(SlowRenderer);
        let mut message = RenderedMessage::new(Vec::new());
        for source in sources {
            message.push_text("before");
            message.push_diagram(source, Arc::clone(&renderer), timeout);
        }
        message
    }

    fn states(message: &RenderedMessage) -> Vec<DiagramState> {
        message.diagram_slots().map(|slot| slot.state().clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_land_in_source_order() {
        let mut message = message_with(&["300", "10", "100"], None);
        assert_eq!(message.pending_count(), 3);

        message.resolve().await;

        assert!(message.is_resolved());
        assert_eq!(
            states(&message),
            [
                DiagramState::Ready(RenderedDiagram::new("<svg>300</svg>")),
                DiagramState::Ready(RenderedDiagram::new("<svg>10</svg>")),
                DiagramState::Ready(RenderedDiagram::new("<svg>100</svg>")),
            ]
        );
    }

    #[test]
    fn test_without_runtime_diagram_fails() {
        let message = message_with(&["0"], None);

        assert!(message.is_resolved());
        assert_eq!(message.blocks().len(), 2);
        assert_eq!(
            states(&message),
            [DiagramState::Failed {
                message: "no async runtime".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_failure_becomes_placeholder() {
        let mut message = message_with(&["fail", "0"], None);
        message.resolve().await;

        assert_eq!(message.failed_count(), 1);
        let states = states(&message);
        assert_eq!(
            states[0],
            DiagramState::Failed {
                message: "Render error: boom".to_string()
            }
        );
        assert!(matches!(states[1], DiagramState::Ready(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_slot() {
        let mut message = message_with(&["10000"], Some(Duration::from_millis(50)));
        message.resolve().await;

        let DiagramState::Failed { message } = &states(&message)[0] else {
            panic!("expected failure");
        };
        assert!(message.contains("timed out after 50 ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_leaves_slots_pending() {
        let mut message = message_with(&["1000", "2000"], None);

        message.cancel();
        message.resolve().await;

        assert!(message.is_cancelled());
        assert_eq!(message.pending_count(), 2);
        assert_eq!(message.blocks().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_token() {
        let message = message_with(&["1000"], None);
        let token = message.cancel.clone();

        drop(message);

        assert!(token.is_cancelled());
    }
}
