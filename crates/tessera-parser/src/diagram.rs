//! Parser for diagram descriptions.
//!
//! The body of a diagram block is line oriented. The first meaningful line
//! is the header (`flowchart LR`, `graph TD`, `sequenceDiagram`), every
//! following line is one statement. Blank lines and `%%` comments are
//! skipped. Statements are parsed with small winnow parsers; a line that
//! does not parse is reported and parsing continues with the next line so
//! that all malformed statements are reported together.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{alt, delimited, eof, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    token::{one_of, rest, take_till, take_until, take_while},
};

use tessera_core::{
    Span,
    diagram::{
        Diagram, Direction, Edge, EdgeStyle, Flowchart, Message, MessageStyle, NodeShape,
        Participant, Sequence,
    },
};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Leading keywords of flowchart lines that carry no nodes or edges.
const FLOWCHART_IGNORED: &[&str] = &[
    "style",
    "classDef",
    "class",
    "linkStyle",
    "click",
    "subgraph",
    "end",
    "direction",
];

/// Leading keywords of sequence lines that carry no participants or messages.
const SEQUENCE_IGNORED: &[&str] = &[
    "Note",
    "note",
    "loop",
    "alt",
    "else",
    "opt",
    "par",
    "and",
    "critical",
    "break",
    "rect",
    "end",
    "autonumber",
    "activate",
    "deactivate",
    "title",
];

/// A meaningful line of a diagram description.
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    /// Line content without surrounding whitespace.
    text: &'src str,
    span: Span,
}

impl<'src> Line<'src> {
    fn keyword(&self) -> &'src str {
        self.text.split_whitespace().next().unwrap_or_default()
    }
}

/// Split `source` into trimmed, non-blank, non-comment lines.
fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    source
        .split_inclusive('\n')
        .scan(0, |offset, raw| {
            let start = *offset;
            *offset += raw.len();
            Some((start, raw))
        })
        .filter_map(|(start, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with("%%") {
                return None;
            }
            let leading = raw.len() - raw.trim_start().len();
            let start = start + leading;
            Some(Line {
                text,
                span: Span::new(start..start + text.len()),
            })
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Flowchart(Direction),
    Sequence,
}

fn parse_header(line: Line<'_>) -> Result<Header, Diagnostic> {
    let keyword = line.keyword();
    match keyword {
        "flowchart" | "graph" => {
            let argument = line.text[keyword.len()..].trim().trim_end_matches(';');
            if argument.is_empty() {
                return Ok(Header::Flowchart(Direction::default()));
            }
            Direction::from_keyword(argument)
                .map(Header::Flowchart)
                .ok_or_else(|| {
                    let start = line.span.end() - line.text[keyword.len()..].trim_start().len();
                    Diagnostic::error(format!("invalid flowchart direction `{argument}`"))
                        .with_code(ErrorCode::E102)
                        .with_label(Span::new(start..line.span.end()), "unknown direction")
                        .with_help("use one of `TD`, `TB`, `BT`, `LR` or `RL`")
                })
        }
        "sequenceDiagram" => Ok(Header::Sequence),
        _ => Err(
            Diagnostic::error(format!("unsupported diagram type `{keyword}`"))
                .with_code(ErrorCode::E101)
                .with_label(
                    Span::new(line.span.start()..line.span.start() + keyword.len()),
                    "not supported",
                )
                .with_help("start the diagram with `flowchart`, `graph` or `sequenceDiagram`"),
        ),
    }
}

// ===================
// Flowchart statements
// ===================

/// A node mentioned in a statement, with its shape if the statement declares one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRef<'src> {
    id: &'src str,
    shape: Option<(NodeShape, &'src str)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Link<'src> {
    style: EdgeStyle,
    label: Option<&'src str>,
    target: NodeRef<'src>,
}

fn identifier<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn node_shape<'src>(input: &mut Input<'src>) -> IResult<(NodeShape, &'src str)> {
    alt((
        delimited("((", take_until(0.., "))"), "))").map(|text| (NodeShape::Circle, text)),
        delimited("[(", take_until(0.., ")]"), ")]").map(|text| (NodeShape::Database, text)),
        delimited('[', take_till(0.., ']'), ']').map(|text| (NodeShape::Rectangle, text)),
        delimited('(', take_till(0.., ')'), ')').map(|text| (NodeShape::Rounded, text)),
        delimited('{', take_till(0.., '}'), '}').map(|text| (NodeShape::Diamond, text)),
    ))
    .parse_next(input)
}

fn node_ref<'src>(input: &mut Input<'src>) -> IResult<NodeRef<'src>> {
    (identifier, opt(node_shape))
        .map(|(id, shape)| NodeRef { id, shape })
        .parse_next(input)
}

fn edge_style<'src>(input: &mut Input<'src>) -> IResult<EdgeStyle> {
    alt((
        "-.->".value(EdgeStyle::Dotted),
        "-->".value(EdgeStyle::Arrow),
        "---".value(EdgeStyle::Line),
        "==>".value(EdgeStyle::Thick),
    ))
    .parse_next(input)
}

/// Parse `|label|`.
fn edge_label<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('|', take_till(0.., '|'), '|').parse_next(input)
}

fn link<'src>(input: &mut Input<'src>) -> IResult<Link<'src>> {
    let style = delimited(space0, edge_style, space0).parse_next(input)?;
    let label = opt(terminated(edge_label, space0)).parse_next(input)?;
    let target = node_ref.parse_next(input)?;
    Ok(Link {
        style,
        label,
        target,
    })
}

/// Optional trailing semicolon, then end of line.
fn statement_end<'src>(input: &mut Input<'src>) -> IResult<()> {
    (space0, opt(';'), space0, eof).void().parse_next(input)
}

/// Parse `A[Label] --> B -->|yes| C` into its first node and the chain of links.
fn flowchart_statement<'src>(input: &mut Input<'src>) -> IResult<(NodeRef<'src>, Vec<Link<'src>>)> {
    terminated((node_ref, repeat(0.., link)), statement_end).parse_next(input)
}

/// Strip surrounding whitespace and double quotes from a label.
fn clean_label(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

fn declare(chart: &mut Flowchart, node: NodeRef<'_>) {
    match node.shape {
        Some((shape, label)) => chart.declare_node(node.id, Some(clean_label(label)), shape),
        None => chart.declare_node(node.id, None, NodeShape::default()),
    }
}

fn apply_flowchart_statement(chart: &mut Flowchart, first: NodeRef<'_>, links: Vec<Link<'_>>) {
    declare(chart, first);
    let mut from = first.id;
    for link in links {
        declare(chart, link.target);
        let label = link
            .label
            .map(clean_label)
            .filter(|label| !label.is_empty());
        chart.add_edge(Edge::new(from, link.target.id, link.style, label));
        from = link.target.id;
    }
}

// ===================
// Sequence statements
// ===================

#[derive(Debug, Clone, PartialEq, Eq)]
enum SequenceStatement {
    Participant(Participant),
    Message(Message),
}

fn message_style<'src>(input: &mut Input<'src>) -> IResult<MessageStyle> {
    alt((
        "-->>".value(MessageStyle::Dashed),
        "->>".value(MessageStyle::Solid),
        "-->".value(MessageStyle::DashedOpen),
        "->".value(MessageStyle::SolidOpen),
    ))
    .parse_next(input)
}

/// Participant names may contain spaces (`API Gateway`) but no arrow or
/// separator characters.
fn is_participant_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['-', '>', ':', '+', ',', ';'])
}

fn participant_name<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| !matches!(c, '-' | '>' | ':' | '+' | ',' | ';'))
        .map(str::trim)
        .verify(|name: &str| !name.is_empty())
        .parse_next(input)
}

/// Parse `participant A`, `actor U as User`.
fn participant_declaration<'src>(input: &mut Input<'src>) -> IResult<Participant> {
    let is_actor = terminated(
        alt(("participant".value(false), "actor".value(true))),
        space1,
    )
    .parse_next(input)?;
    let (id, label) = rest
        .map(|text: &'src str| match text.split_once(" as ") {
            Some((id, label)) => (id.trim(), label.trim()),
            None => (text.trim(), text.trim()),
        })
        .verify(|(id, label): &(&str, &str)| is_participant_name(id) && !label.is_empty())
        .parse_next(input)?;

    Ok(Participant::new(id, label, is_actor))
}

/// Parse `A->>B: text`. Activation markers (`+`/`-`) before the target are accepted.
fn sequence_message<'src>(input: &mut Input<'src>) -> IResult<Message> {
    let from = participant_name.parse_next(input)?;
    let style = message_style.parse_next(input)?;
    opt(one_of(['+', '-'])).parse_next(input)?;
    let to = participant_name.parse_next(input)?;
    let text = opt(preceded(':', rest)).parse_next(input)?;
    statement_end.parse_next(input)?;

    Ok(Message::new(from, to, style, text.unwrap_or_default().trim()))
}

fn sequence_statement<'src>(input: &mut Input<'src>) -> IResult<SequenceStatement> {
    alt((
        participant_declaration.map(SequenceStatement::Participant),
        sequence_message.map(SequenceStatement::Message),
    ))
    .parse_next(input)
}

fn malformed(line: Line<'_>, help: &str) -> Diagnostic {
    Diagnostic::error(format!("cannot parse statement `{}`", line.text))
        .with_code(ErrorCode::E103)
        .with_label(line.span, ErrorCode::E103.description())
        .with_help(help)
}

fn parse_flowchart<'src>(
    direction: Direction,
    statements: impl Iterator<Item = Line<'src>>,
    collector: &mut DiagnosticCollector,
) -> Flowchart {
    let mut chart = Flowchart::new(direction);
    for line in statements {
        if FLOWCHART_IGNORED.contains(&line.keyword()) {
            trace!(line = line.text; "Skipping flowchart line");
            continue;
        }
        let mut input = line.text;
        match flowchart_statement.parse_next(&mut input) {
            Ok((first, links)) => apply_flowchart_statement(&mut chart, first, links),
            Err(_) => collector.emit(malformed(
                line,
                "expected nodes joined by `-->`, `---`, `-.->` or `==>`",
            )),
        }
    }
    chart
}

fn parse_sequence<'src>(
    statements: impl Iterator<Item = Line<'src>>,
    collector: &mut DiagnosticCollector,
) -> Sequence {
    let mut sequence = Sequence::new();
    for line in statements {
        if SEQUENCE_IGNORED.contains(&line.keyword()) {
            trace!(line = line.text; "Skipping sequence line");
            continue;
        }
        let mut input = line.text;
        match sequence_statement.parse_next(&mut input) {
            Ok(SequenceStatement::Participant(participant)) => {
                sequence.declare_participant(participant)
            }
            Ok(SequenceStatement::Message(message)) => sequence.add_message(message),
            Err(_) => collector.emit(malformed(
                line,
                "expected `participant A`, `actor A as Label` or `A->>B: text`",
            )),
        }
    }
    sequence
}

/// Parse the body of a diagram block.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every problem found: a blank source
/// (`E100`), an unknown header (`E101`), a bad direction (`E102`), each
/// malformed statement (`E103`), or a header with nothing after it (`E104`).
///
/// # Example
///
/// ```
/// # use tessera_parser::parse_diagram;
/// # use tessera_core::diagram::{Diagram, DiagramKind};
/// let diagram = parse_diagram("flowchart LR\n  A[Start] --> B{Ok?}\n  B -->|yes| C").unwrap();
/// assert_eq!(diagram.kind(), DiagramKind::Flowchart);
///
/// let Diagram::Flowchart(chart) = diagram else { unreachable!() };
/// assert_eq!(chart.node_count(), 3);
/// assert_eq!(chart.edges()[1].label(), Some("yes"));
/// ```
pub fn parse_diagram(source: &str) -> Result<Diagram, ParseError> {
    let mut lines = lines(source);
    let Some(header_line) = lines.next() else {
        return Err(Diagnostic::error("diagram has no header")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..source.len()), ErrorCode::E100.description())
            .with_help("start the diagram with `flowchart TD` or `sequenceDiagram`")
            .into());
    };
    let header = parse_header(header_line)?;

    let mut collector = DiagnosticCollector::new();
    let diagram = match header {
        Header::Flowchart(direction) => {
            Diagram::Flowchart(parse_flowchart(direction, lines, &mut collector))
        }
        Header::Sequence => Diagram::Sequence(parse_sequence(lines, &mut collector)),
    };
    collector.finish()?;

    let is_empty = match &diagram {
        Diagram::Flowchart(chart) => chart.node_count() == 0,
        Diagram::Sequence(sequence) => sequence.participant_count() == 0,
    };
    if is_empty {
        return Err(Diagnostic::error(format!("{} diagram is empty", diagram.kind()))
            .with_code(ErrorCode::E104)
            .with_label(header_line.span, "nothing follows this header")
            .into());
    }

    debug!(diagram_kind:? = diagram.kind(); "Diagram parsed");
    Ok(diagram)
}
