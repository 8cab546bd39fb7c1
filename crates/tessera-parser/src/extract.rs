//! Segment extraction.
//!
//! [`extract`] splits a message into plain-text, code and diagram
//! [`Segment`]s. It runs two fence scans over the message, one that only
//! accepts the diagram info string and one that accepts any info string, and
//! reconciles the two candidate lists into a single non-overlapping,
//! start-ordered list of blocks. Text between blocks becomes plain text
//! unless it is blank.
//!
//! Extraction is total: malformed or unterminated fences degrade to plain
//! text and are reported as warnings next to the segments.

use log::{debug, trace};

use tessera_core::{
    Segment, Span,
    segment::{DEFAULT_DIAGRAM_LANGUAGE, DEFAULT_LANGUAGE, FENCE},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    fence::{self, RawFence},
};

/// Configuration for segment extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    diagram_language: String,
    default_language: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ExtractConfig {
    /// Create a new extraction configuration.
    ///
    /// # Arguments
    ///
    /// * `diagram_language` - Info string that marks a diagram block.
    /// * `default_language` - Language reported for code blocks without an info string.
    pub fn new(diagram_language: impl Into<String>, default_language: impl Into<String>) -> Self {
        Self {
            diagram_language: diagram_language.into(),
            default_language: default_language.into(),
        }
    }

    pub fn with_diagram_language(mut self, diagram_language: impl Into<String>) -> Self {
        self.diagram_language = diagram_language.into();
        self
    }

    pub fn with_default_language(mut self, default_language: impl Into<String>) -> Self {
        self.default_language = default_language.into();
        self
    }

    pub fn diagram_language(&self) -> &str {
        &self.diagram_language
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}

/// Segments of a message plus the warnings raised while extracting them.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Warnings about fences that were kept as plain text or are unsupported.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn into_parts(self) -> (Vec<Segment>, Vec<Diagnostic>) {
        (self.segments, self.diagnostics)
    }
}

/// Which pass produced a candidate block.
///
/// The discriminant order is the priority order: at equal start offsets a
/// diagram candidate is considered before its generic twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BlockKind {
    Diagram,
    Code,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'src> {
    fence: RawFence<'src>,
    kind: BlockKind,
}

impl Candidate<'_> {
    fn into_segment(self, config: &ExtractConfig) -> Segment {
        let RawFence {
            span, info, body, ..
        } = self.fence;
        match self.kind {
            BlockKind::Diagram => {
                Segment::diagram_block(body, info.unwrap_or(config.diagram_language()), span)
            }
            BlockKind::Code => Segment::code_block(
                body,
                info.map(str::to_string),
                config.default_language(),
                span,
            ),
        }
    }
}

/// Extract segments from a message with the default configuration.
///
/// # Example
///
/// ```
/// # use tessera_parser::extract_segments;
/// # use tessera_core::SegmentKind;
/// let segments = extract_segments("Intro\n```python\nprint(1)\n```\nOutro");
///
/// let kinds: Vec<_> = segments.iter().map(|s| s.kind()).collect();
/// assert_eq!(
///     kinds,
///     [SegmentKind::PlainText, SegmentKind::CodeBlock, SegmentKind::PlainText]
/// );
/// assert_eq!(segments[1].language(), Some("python"));
/// assert_eq!(segments[1].payload(), "print(1)");
/// ```
pub fn extract_segments(message: &str) -> Vec<Segment> {
    extract(message, &ExtractConfig::default()).into_segments()
}

/// Extract segments from a message.
///
/// Never fails. The returned segments are ordered by start offset, never
/// overlap, and contain no blank plain-text segments. An empty or blank
/// message yields no segments.
pub fn extract(message: &str, config: &ExtractConfig) -> Extraction {
    let diagram_pass = fence::scan(message, |info| info == Some(config.diagram_language()));
    let code_pass = fence::scan(message, |_| true);
    trace!(
        diagram_matches = diagram_pass.fences.len(),
        code_matches = code_pass.fences.len();
        "Fence passes complete"
    );

    let mut candidates: Vec<Candidate<'_>> = diagram_pass
        .fences
        .into_iter()
        .map(|fence| Candidate {
            fence,
            kind: BlockKind::Diagram,
        })
        .chain(code_pass.fences.into_iter().map(|fence| Candidate {
            fence,
            kind: BlockKind::Code,
        }))
        .collect();
    candidates.sort_by_key(|candidate| (candidate.fence.span.start(), candidate.kind));

    let blocks = reconcile(candidates);

    let mut collector = DiagnosticCollector::new();
    if let Some(opener) = code_pass.unterminated {
        collector.emit(
            Diagnostic::warning("fence is never closed")
                .with_code(ErrorCode::W001)
                .with_label(opener, ErrorCode::W001.description())
                .with_help("the fence and the text after it are shown as plain text"),
        );
    }
    for block in &blocks {
        report_nested_fence(&mut collector, &block.fence);
    }

    let segments = assemble(message, blocks, config);
    debug!(
        segments = segments.len(),
        message_len = message.len();
        "Message segmented"
    );

    Extraction {
        segments,
        diagnostics: collector.into_diagnostics(),
    }
}

/// Keep candidates that start at or after the end of the last kept one.
///
/// Candidates must be sorted by `(start, kind)`. Dropping every candidate
/// that starts inside an accepted span removes the generic twin of each
/// diagram block as well as any block found inside another block's body.
fn reconcile(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let mut accepted: Vec<Candidate<'_>> = Vec::with_capacity(candidates.len());
    let mut cursor = 0;

    for candidate in candidates {
        let span = candidate.fence.span;
        if span.start() < cursor {
            trace!(span:?, kind:? = candidate.kind; "Dropping covered candidate");
            continue;
        }
        cursor = span.end();
        accepted.push(candidate);
    }

    accepted
}

/// Interleave accepted blocks with the non-blank text between them.
fn assemble(message: &str, blocks: Vec<Candidate<'_>>, config: &ExtractConfig) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(blocks.len() * 2 + 1);
    let mut cursor = 0;

    for block in blocks {
        let span = block.fence.span;
        push_plain_text(&mut segments, message, Span::new(cursor..span.start()));
        segments.push(block.into_segment(config));
        cursor = span.end();
    }
    push_plain_text(&mut segments, message, Span::new(cursor..message.len()));

    segments
}

fn push_plain_text(segments: &mut Vec<Segment>, message: &str, span: Span) {
    let text = &message[span.range()];
    if !text.trim().is_empty() {
        segments.push(Segment::plain_text(text, span));
    }
}

fn report_nested_fence(collector: &mut DiagnosticCollector, fence: &RawFence<'_>) {
    let Some(offset) = fence.body.find(FENCE) else {
        return;
    };
    let start = fence.body_span.start() + offset;
    collector.emit(
        Diagnostic::warning("fence marker inside a block body")
            .with_code(ErrorCode::W002)
            .with_label(Span::new(start..start + FENCE.len()), "nested fence")
            .with_secondary_label(fence.span, "inside this block")
            .with_help("nested fences are not supported; the block ends at the first closing fence"),
    );
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use tessera_core::{SegmentKind, segment::reconstruct};

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Messages assembled from fence-heavy fragments so that openers,
    /// closers, info strings and multibyte text collide often.
    fn message_strategy() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            Just("```"),
            Just("```js\n"),
            Just("```mermaid\n"),
            Just("```\n"),
            Just("\n```"),
            Just("\n"),
            Just(" "),
            Just("`"),
            Just("A-->B"),
            Just("text"),
            Just("naïve ✓"),
        ];
        prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
    }

    /// Messages with no fence marker anywhere.
    fn fenceless_strategy() -> impl Strategy<Value = String> {
        "[a-z \n\t`é]{0,40}".prop_filter("no fence", |s| !s.contains(FENCE))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every segment is the exact source slice its span covers, and every
    /// uncovered gap is blank.
    fn check_source_fidelity(message: &str) -> Result<(), TestCaseError> {
        let segments = extract_segments(message);
        let mut cursor = 0;
        for segment in &segments {
            let span = segment.span();
            prop_assert!(
                message[cursor..span.start()].trim().is_empty(),
                "non-blank gap dropped before {span}"
            );
            prop_assert_eq!(&message[span.range()], segment.to_source());
            if segment.is_plain_text() {
                prop_assert_eq!(segment.payload(), &message[span.range()]);
            }
            cursor = span.end();
        }
        prop_assert!(message[cursor..].trim().is_empty());
        Ok(())
    }

    /// Segments are strictly ordered and never overlap.
    fn check_ordering(message: &str) -> Result<(), TestCaseError> {
        let segments = extract_segments(message);
        for pair in segments.windows(2) {
            prop_assert!(pair[0].span().start() < pair[1].span().start());
            prop_assert!(pair[0].span().end() <= pair[1].span().start());
        }
        Ok(())
    }

    /// Extracting the reconstructed text yields the same segments.
    fn check_idempotence(message: &str) -> Result<(), TestCaseError> {
        let shape = |segments: &[Segment]| -> Vec<(SegmentKind, String, Option<String>)> {
            segments
                .iter()
                .map(|s| (s.kind(), s.payload().to_string(), s.info().map(str::to_string)))
                .collect()
        };

        let first = extract_segments(message);
        let second = extract_segments(&reconstruct(&first));
        prop_assert_eq!(shape(&first), shape(&second));
        Ok(())
    }

    /// Only code blocks carry a language.
    fn check_language_only_on_code(message: &str) -> Result<(), TestCaseError> {
        for segment in extract_segments(message) {
            prop_assert_eq!(segment.language().is_some(), segment.is_code_block());
        }
        Ok(())
    }

    /// Without fences the message is one plain-text segment, or nothing.
    fn check_fenceless(message: &str) -> Result<(), TestCaseError> {
        let segments = extract_segments(message);
        if message.trim().is_empty() {
            prop_assert!(segments.is_empty());
        } else {
            prop_assert_eq!(segments.len(), 1);
            prop_assert_eq!(segments[0].kind(), SegmentKind::PlainText);
            prop_assert_eq!(segments[0].payload(), message);
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn source_fidelity(message in message_strategy()) {
            check_source_fidelity(&message)?;
        }

        #[test]
        fn ordering(message in message_strategy()) {
            check_ordering(&message)?;
        }

        #[test]
        fn idempotence(message in message_strategy()) {
            check_idempotence(&message)?;
        }

        #[test]
        fn language_only_on_code(message in message_strategy()) {
            check_language_only_on_code(&message)?;
        }

        #[test]
        fn fenceless(message in fenceless_strategy()) {
            check_fenceless(&message)?;
        }
    }
}
