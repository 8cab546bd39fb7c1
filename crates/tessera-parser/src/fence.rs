//! Fence scanning.
//!
//! A fenced block is an opening fence (```` ``` ```` plus an optional info
//! string of ASCII word characters, then a newline), a body, and the nearest
//! following `"\n```"`. The opening fence may start anywhere in the text.
//!
//! [`scan`] walks a message left to right the way a global pattern search
//! does: after a match it resumes at the end of the match, after a failed
//! attempt it moves one character forward.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{delimited, opt, terminated},
    error::{ContextError, ErrMode},
    token::{literal, take_until, take_while},
};

use tessera_core::{Span, segment::FENCE};

/// Newline followed by a fence: the only thing that closes a block.
pub(crate) const CLOSING_FENCE: &str = "\n```";

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// A fenced block matched in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawFence<'src> {
    /// Whole match, both fences included.
    pub span: Span,
    pub info: Option<&'src str>,
    pub body: &'src str,
    pub body_span: Span,
}

/// Result of one left-to-right pass over a message.
#[derive(Debug, Default)]
pub(crate) struct Scan<'src> {
    pub fences: Vec<RawFence<'src>>,
    /// First accepted opening fence that has no closing fence after it.
    pub unterminated: Option<Span>,
}

/// Parse an info string: one or more ASCII word characters.
fn info_string<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// Parse an opening fence and return its info string, if any.
fn opening_fence<'src>(input: &mut Input<'src>) -> IResult<Option<&'src str>> {
    delimited(literal(FENCE), opt(info_string), '\n').parse_next(input)
}

/// Parse a body up to and including the nearest closing fence.
///
/// The body may be empty. Only the body is returned.
fn fence_body<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    terminated(take_until(0.., CLOSING_FENCE), literal(CLOSING_FENCE)).parse_next(input)
}

/// Scan `message` for fenced blocks whose info string satisfies `accept`.
///
/// An opening fence rejected by `accept` is treated like a failed match, so
/// the scan moves past it one character at a time and may find blocks that
/// start inside what another pass would consider a block body.
pub(crate) fn scan<'src, F>(message: &'src str, accept: F) -> Scan<'src>
where
    F: Fn(Option<&str>) -> bool,
{
    let mut result = Scan::default();
    let mut offset = 0;

    while let Some(found) = message[offset..].find(FENCE) {
        let start = offset + found;
        let mut input: Input<'src> = &message[start..];

        let info = match opening_fence.parse_next(&mut input) {
            Ok(info) if accept(info) => info,
            // The backtick at `start` is a single byte
            _ => {
                offset = start + 1;
                continue;
            }
        };
        let body_start = message.len() - input.len();

        let Ok(body) = fence_body.parse_next(&mut input) else {
            // No closing fence after this opener means none after any later
            // opener either, so the scan is over.
            let opener = Span::new(start..body_start);
            trace!(opener:?; "Unterminated fence");
            result.unterminated = Some(opener);
            break;
        };

        let end = message.len() - input.len();
        result.fences.push(RawFence {
            span: Span::new(start..end),
            info,
            body,
            body_span: Span::new(body_start..body_start + body.len()),
        });
        offset = end;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_info(_: Option<&str>) -> bool {
        true
    }

    #[test]
    fn test_opening_fence_with_info() {
        let mut input = "```python\nprint(1)";
        assert_eq!(opening_fence(&mut input).unwrap(), Some("python"));
        assert_eq!(input, "print(1)");
    }

    #[test]
    fn test_opening_fence_without_info() {
        let mut input = "```\nbody";
        assert_eq!(opening_fence(&mut input).unwrap(), None);
        assert_eq!(input, "body");
    }

    #[test]
    fn test_opening_fence_rejects_non_word_info() {
        assert!(opening_fence(&mut "```c++\n").is_err());
        assert!(opening_fence(&mut "``` js\n").is_err());
        assert!(opening_fence(&mut "```js").is_err());
    }

    #[test]
    fn test_fence_body_is_non_greedy() {
        let mut input = "one\n```\ntwo\n```";
        assert_eq!(fence_body(&mut input).unwrap(), "one");
        assert_eq!(input, "\ntwo\n```");
    }

    #[test]
    fn test_fence_body_may_be_empty() {
        let mut input = "\n```";
        assert_eq!(fence_body(&mut input).unwrap(), "");
        assert!(input.is_empty());
    }

    #[test]
    fn test_scan_records_spans() {
        let message = "Hi ```js\nlet x;\n``` bye";
        let scan = scan(message, any_info);

        assert_eq!(scan.fences.len(), 1);
        let fence = scan.fences[0];
        assert_eq!(fence.info, Some("js"));
        assert_eq!(fence.body, "let x;");
        assert_eq!(&message[fence.span.range()], "```js\nlet x;\n```");
        assert_eq!(&message[fence.body_span.range()], "let x;");
        assert!(scan.unterminated.is_none());
    }

    #[test]
    fn test_scan_adjacent_blocks() {
        let scan = scan("```js\n1\n``````js\n2\n```", any_info);

        let bodies: Vec<_> = scan.fences.iter().map(|f| f.body).collect();
        assert_eq!(bodies, ["1", "2"]);
        assert_eq!(scan.fences[0].span.end(), scan.fences[1].span.start());
    }

    #[test]
    fn test_scan_unterminated() {
        let scan = scan("before ```js\nconsole.log(1)", any_info);

        assert!(scan.fences.is_empty());
        assert_eq!(scan.unterminated, Some(Span::new(7..13)));
    }

    #[test]
    fn test_scan_filter_looks_inside_rejected_blocks() {
        let message = "```js\n```mermaid\nA\n```";
        let all = scan(message, any_info);
        let diagrams = scan(message, |info| info == Some("mermaid"));

        assert_eq!(all.fences.len(), 1);
        assert_eq!(all.fences[0].body, "```mermaid\nA");
        assert_eq!(diagrams.fences.len(), 1);
        assert_eq!(diagrams.fences[0].span.start(), 6);
    }

    #[test]
    fn test_scan_handles_multibyte_text() {
        let message = "café ```\nnaïve\n``` fin";
        let scan = scan(message, any_info);

        assert_eq!(scan.fences.len(), 1);
        assert_eq!(scan.fences[0].body, "naïve");
        assert_eq!(&message[scan.fences[0].span.range()], "```\nnaïve\n```");
    }
}
