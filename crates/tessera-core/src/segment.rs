//! Typed segments of a decomposed message.
//!
//! A message is split into an ordered list of [`Segment`]s. Each segment is
//! one of three [`SegmentKind`]s and carries the [`Span`] of the source text
//! it was cut from. Fenced segments keep their raw info string so that the
//! original fence can be written back with [`Segment::to_source`].

use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// Info string that routes a fenced block to the diagram renderer.
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Language reported for a code block whose fence has no info string.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";

/// The kind of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Prose between fenced blocks, rendered verbatim.
    PlainText,
    /// A fenced block handed to the code highlighter.
    CodeBlock,
    /// A fenced block whose info string is the diagram token.
    DiagramBlock,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::PlainText => write!(f, "text"),
            SegmentKind::CodeBlock => write!(f, "code"),
            SegmentKind::DiagramBlock => write!(f, "diagram"),
        }
    }
}

/// One classified, ordered unit of a decomposed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    kind: SegmentKind,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<String>,
    span: Span,
}

impl Segment {
    /// Create a plain-text segment covering `span` verbatim.
    pub fn plain_text(payload: impl Into<String>, span: Span) -> Self {
        Self {
            kind: SegmentKind::PlainText,
            payload: payload.into(),
            language: None,
            info: None,
            span,
        }
    }

    /// Create a code-block segment.
    ///
    /// The reported language is the info string when present, otherwise
    /// `default_language`. The raw info string is kept separately so the
    /// fence can be reconstructed exactly.
    pub fn code_block(
        payload: impl Into<String>,
        info: Option<String>,
        default_language: &str,
        span: Span,
    ) -> Self {
        let language = info
            .clone()
            .unwrap_or_else(|| default_language.to_string());
        Self {
            kind: SegmentKind::CodeBlock,
            payload: payload.into(),
            language: Some(language),
            info,
            span,
        }
    }

    /// Create a diagram-block segment.
    pub fn diagram_block(payload: impl Into<String>, info: impl Into<String>, span: Span) -> Self {
        Self {
            kind: SegmentKind::DiagramBlock,
            payload: payload.into(),
            language: None,
            info: Some(info.into()),
            span,
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The segment content. For fenced blocks the fences are stripped.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The highlighter language. Only set for [`SegmentKind::CodeBlock`].
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The info string exactly as written after the opening fence.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// The source range this segment was cut from, fences included.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_plain_text(&self) -> bool {
        self.kind == SegmentKind::PlainText
    }

    pub fn is_code_block(&self) -> bool {
        self.kind == SegmentKind::CodeBlock
    }

    pub fn is_diagram_block(&self) -> bool {
        self.kind == SegmentKind::DiagramBlock
    }

    /// The payload as shown to a reader.
    ///
    /// Plain text has its surrounding blank space trimmed; fenced payloads
    /// are returned unchanged.
    pub fn display_text(&self) -> &str {
        match self.kind {
            SegmentKind::PlainText => self.payload.trim(),
            SegmentKind::CodeBlock | SegmentKind::DiagramBlock => &self.payload,
        }
    }

    /// Write the segment back in source form.
    ///
    /// For fenced blocks this re-adds the opening fence, the info string and
    /// the closing fence. The result equals the slice of the original
    /// message covered by [`Segment::span`].
    pub fn to_source(&self) -> String {
        match self.kind {
            SegmentKind::PlainText => self.payload.clone(),
            SegmentKind::CodeBlock | SegmentKind::DiagramBlock => format!(
                "{FENCE}{}\n{}\n{FENCE}",
                self.info.as_deref().unwrap_or_default(),
                self.payload
            ),
        }
    }
}

/// Concatenate the source form of every segment in order.
///
/// Blank gaps that were suppressed during extraction are not part of any
/// segment and therefore do not reappear here.
pub fn reconstruct(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_defaults_language() {
        let segment = Segment::code_block("x = 1", None, DEFAULT_LANGUAGE, Span::new(0..13));
        assert_eq!(segment.kind(), SegmentKind::CodeBlock);
        assert_eq!(segment.language(), Some("text"));
        assert_eq!(segment.info(), None);
        assert_eq!(segment.to_source(), "```\nx = 1\n```");
    }

    #[test]
    fn test_code_block_keeps_info() {
        let segment = Segment::code_block(
            "print(1)",
            Some("python".to_string()),
            DEFAULT_LANGUAGE,
            Span::new(0..22),
        );
        assert_eq!(segment.language(), Some("python"));
        assert_eq!(segment.to_source(), "```python\nprint(1)\n```");
    }

    #[test]
    fn test_diagram_block_has_no_language() {
        let segment = Segment::diagram_block("A-->B", "mermaid", Span::new(0..20));
        assert!(segment.is_diagram_block());
        assert_eq!(segment.language(), None);
        assert_eq!(segment.to_source(), "```mermaid\nA-->B\n```");
    }

    #[test]
    fn test_display_text_trims_plain_text_only() {
        let text = Segment::plain_text("\n\nIntro text.\n\n", Span::new(0..15));
        assert_eq!(text.display_text(), "Intro text.");
        assert_eq!(text.payload(), "\n\nIntro text.\n\n");

        let code = Segment::code_block("  indented", None, DEFAULT_LANGUAGE, Span::new(0..18));
        assert_eq!(code.display_text(), "  indented");
    }

    #[test]
    fn test_reconstruct_concatenates_in_order() {
        let segments = vec![
            Segment::plain_text("Intro ", Span::new(0..6)),
            Segment::code_block("1", Some("js".to_string()), DEFAULT_LANGUAGE, Span::new(6..17)),
        ];
        assert_eq!(reconstruct(&segments), "Intro ```js\n1\n```");
    }

    #[test]
    fn test_segment_kind_display() {
        assert_eq!(SegmentKind::PlainText.to_string(), "text");
        assert_eq!(SegmentKind::CodeBlock.to_string(), "code");
        assert_eq!(SegmentKind::DiagramBlock.to_string(), "diagram");
    }
}
