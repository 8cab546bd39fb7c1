//! Semantic model of a diagram description.
//!
//! A diagram block's payload is parsed into a [`Diagram`], which is either a
//! [`Flowchart`] (nodes and edges) or a [`Sequence`] (participants and
//! messages). Nodes and participants keep their declaration order, which is
//! also the order renderers place them in.

use std::fmt;

use indexmap::IndexMap;
use log::trace;

/// The kind of a parsed diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Flowchart,
    Sequence,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Flowchart => write!(f, "flowchart"),
            DiagramKind::Sequence => write!(f, "sequence"),
        }
    }
}

/// A parsed diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagram {
    Flowchart(Flowchart),
    Sequence(Sequence),
}

impl Diagram {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Diagram::Flowchart(_) => DiagramKind::Flowchart,
            Diagram::Sequence(_) => DiagramKind::Sequence,
        }
    }
}

/// Flow direction of a flowchart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `TD` or `TB`
    #[default]
    TopDown,
    /// `BT`
    BottomUp,
    /// `LR`
    LeftRight,
    /// `RL`
    RightLeft,
}

impl Direction {
    /// Parses a direction keyword such as `TD` or `LR`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "TD" | "TB" => Some(Direction::TopDown),
            "BT" => Some(Direction::BottomUp),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            _ => None,
        }
    }

    /// Returns `true` if ranks are stacked vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::TopDown | Direction::BottomUp)
    }

    /// Returns `true` if ranks run against the axis (bottom-up or right-to-left).
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::BottomUp | Direction::RightLeft)
    }
}

/// Outline of a flowchart node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// `A[text]`
    #[default]
    Rectangle,
    /// `A(text)`
    Rounded,
    /// `A{text}`
    Diamond,
    /// `A((text))`
    Circle,
    /// `A[(text)]`
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    label: String,
    shape: NodeShape,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }
}

/// Line style of a flowchart edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    /// `-->`
    #[default]
    Arrow,
    /// `---`
    Line,
    /// `-.->`
    Dotted,
    /// `==>`
    Thick,
}

impl EdgeStyle {
    /// Returns `true` if the edge ends with an arrow head.
    pub fn has_arrow_head(self) -> bool {
        !matches!(self, EdgeStyle::Line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: String,
    to: String,
    style: EdgeStyle,
    label: Option<String>,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        style: EdgeStyle,
        label: Option<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style,
            label,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A flowchart: nodes in declaration order plus directed edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flowchart {
    direction: Direction,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Flowchart {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Position of a node in declaration order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Declares a node or refines an existing one.
    ///
    /// A bare reference (`label == None`) creates a rectangle labeled with
    /// its id and never overwrites an earlier explicit declaration.
    pub fn declare_node(&mut self, id: &str, label: Option<String>, shape: NodeShape) {
        match (self.nodes.get_mut(id), label) {
            (Some(node), Some(label)) => {
                node.label = label;
                node.shape = shape;
            }
            (Some(_), None) => {}
            (None, label) => {
                let label = label.unwrap_or_else(|| id.to_string());
                trace!(id, label; "Declaring flowchart node");
                self.nodes
                    .insert(id.to_string(), Node::new(id, label, shape));
            }
        }
    }

    /// Adds an edge. Both endpoints must already be declared.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: String,
    label: String,
    is_actor: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, label: impl Into<String>, is_actor: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_actor,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_actor(&self) -> bool {
        self.is_actor
    }
}

/// Line and head style of a sequence message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageStyle {
    /// `->>`
    #[default]
    Solid,
    /// `-->>`
    Dashed,
    /// `->`
    SolidOpen,
    /// `-->`
    DashedOpen,
}

impl MessageStyle {
    pub fn is_dashed(self) -> bool {
        matches!(self, MessageStyle::Dashed | MessageStyle::DashedOpen)
    }

    pub fn has_arrow_head(self) -> bool {
        matches!(self, MessageStyle::Solid | MessageStyle::Dashed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    from: String,
    to: String,
    style: MessageStyle,
    text: String,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        style: MessageStyle,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style,
            text: text.into(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn style(&self) -> MessageStyle {
        self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A sequence diagram: participants in order of first appearance plus messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    participants: IndexMap<String, Participant>,
    messages: Vec<Message>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn participant_index(&self, id: &str) -> Option<usize> {
        self.participants.get_index_of(id)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Declares a participant explicitly. A later declaration replaces the
    /// label of an earlier implicit one but keeps its position.
    pub fn declare_participant(&mut self, participant: Participant) {
        self.participants
            .insert(participant.id.clone(), participant);
    }

    /// Adds a message, declaring unknown endpoints as plain participants.
    pub fn add_message(&mut self, message: Message) {
        for id in [message.from.as_str(), message.to.as_str()] {
            if !self.participants.contains_key(id) {
                self.participants
                    .insert(id.to_string(), Participant::new(id, id, false));
            }
        }
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_keywords() {
        assert_eq!(Direction::from_keyword("TD"), Some(Direction::TopDown));
        assert_eq!(Direction::from_keyword("TB"), Some(Direction::TopDown));
        assert_eq!(Direction::from_keyword("LR"), Some(Direction::LeftRight));
        assert_eq!(Direction::from_keyword("XX"), None);
        assert!(Direction::BottomUp.is_vertical());
        assert!(Direction::RightLeft.is_reversed());
        assert!(!Direction::LeftRight.is_vertical());
    }

    #[test]
    fn test_declare_node_keeps_explicit_label() {
        let mut chart = Flowchart::new(Direction::TopDown);
        chart.declare_node("A", Some("Start".to_string()), NodeShape::Rounded);
        chart.declare_node("A", None, NodeShape::Rectangle);

        let node = chart.node("A").expect("node declared");
        assert_eq!(node.label(), "Start");
        assert_eq!(node.shape(), NodeShape::Rounded);
    }

    #[test]
    fn test_declare_node_refines_bare_reference() {
        let mut chart = Flowchart::new(Direction::LeftRight);
        chart.declare_node("B", None, NodeShape::Rectangle);
        chart.declare_node("A", None, NodeShape::Rectangle);
        chart.declare_node("B", Some("Check".to_string()), NodeShape::Diamond);

        let ids: Vec<_> = chart.nodes().map(Node::id).collect();
        assert_eq!(ids, ["B", "A"]);
        assert_eq!(chart.node("B").map(Node::label), Some("Check"));
        assert_eq!(chart.node_index("A"), Some(1));
    }

    #[test]
    fn test_sequence_implicit_participants() {
        let mut seq = Sequence::new();
        seq.declare_participant(Participant::new("C", "Client", false));
        seq.add_message(Message::new("C", "S", MessageStyle::Solid, "hello"));
        seq.add_message(Message::new("S", "C", MessageStyle::Dashed, "hi"));

        let ids: Vec<_> = seq.participants().map(Participant::id).collect();
        assert_eq!(ids, ["C", "S"]);
        assert_eq!(seq.messages().len(), 2);
        assert!(seq.messages()[1].style().is_dashed());
    }

    #[test]
    fn test_diagram_kind() {
        let diagram = Diagram::Sequence(Sequence::new());
        assert_eq!(diagram.kind(), DiagramKind::Sequence);
        assert_eq!(diagram.kind().to_string(), "sequence");
    }
}
