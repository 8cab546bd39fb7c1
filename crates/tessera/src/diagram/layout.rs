//! Placement of diagram elements.
//!
//! Flowcharts are placed in ranks: a node's rank is the length of the
//! longest edge path reaching it, with each cycle collapsed to one rank. Ranks run
//! along the flowchart direction and nodes of one rank sit side by side in
//! declaration order. Sequence diagrams put participants in columns and
//! messages in rows.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    algo::{condensation, toposort},
    graph::{DiGraph, NodeIndex},
};

use tessera_core::{
    diagram::{Edge, Flowchart, Message, Node, NodeShape, Participant, Sequence},
    geometry::{Bounds, Point, Size},
};

/// Approximate advance of one character of label text.
const CHAR_WIDTH: f32 = 7.5;
const LABEL_PADDING: f32 = 32.0;
const MIN_NODE_WIDTH: f32 = 80.0;
const NODE_HEIGHT: f32 = 44.0;
/// Space between nodes of the same rank.
const NODE_GAP: f32 = 40.0;
/// Space between consecutive ranks.
const RANK_GAP: f32 = 60.0;
/// Vertical distance between sequence messages.
const MESSAGE_GAP: f32 = 48.0;

/// Size of a box that fits `label`.
pub(super) fn label_size(label: &str) -> Size {
    let width = label.chars().count() as f32 * CHAR_WIDTH + LABEL_PADDING;
    Size::new(width.max(MIN_NODE_WIDTH), NODE_HEIGHT)
}

fn node_size(node: &Node) -> Size {
    let size = label_size(node.label());
    match node.shape() {
        NodeShape::Circle => {
            let side = size.width().max(size.height());
            Size::new(side, side)
        }
        NodeShape::Diamond => Size::new(size.width() * 1.4, size.height() * 1.6),
        NodeShape::Database => Size::new(size.width(), size.height() + 12.0),
        NodeShape::Rectangle | NodeShape::Rounded => size,
    }
}

/// Point where the segment from the center of `bounds` toward `toward`
/// leaves the box.
fn boundary_point(bounds: Bounds, toward: Point) -> Point {
    let center = bounds.center();
    let dx = toward.x() - center.x();
    let dy = toward.y() - center.y();

    let scale = |delta: f32, half: f32| {
        if delta.abs() > f32::EPSILON {
            half / delta.abs()
        } else {
            f32::INFINITY
        }
    };
    let t = scale(dx, bounds.width() / 2.0).min(scale(dy, bounds.height() / 2.0));
    if !t.is_finite() {
        return center;
    }
    center.add_point(Point::new(dx * t, dy * t))
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PlacedNode<'a> {
    pub node: &'a Node,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum EdgePath {
    Straight { start: Point, end: Point },
    /// Edge from a node to itself, drawn beside the node.
    Loop(Bounds),
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PlacedEdge<'a> {
    pub edge: &'a Edge,
    pub path: EdgePath,
}

#[derive(Debug, Clone, Default)]
pub(super) struct FlowchartLayout<'a> {
    pub nodes: Vec<PlacedNode<'a>>,
    pub edges: Vec<PlacedEdge<'a>>,
}

impl FlowchartLayout<'_> {
    pub fn bounds(&self) -> Bounds {
        let mut nodes = self.nodes.iter();
        let Some(first) = nodes.next() else {
            return Bounds::default();
        };
        nodes.fold(first.bounds, |acc, placed| acc.merge(&placed.bounds))
    }
}

/// Longest-path rank of every node, in declaration order.
///
/// Strongly connected nodes are condensed first, so every node of a cycle
/// shares one rank and the ranking runs over an acyclic graph.
pub(super) fn ranks(chart: &Flowchart) -> IndexMap<&str, usize> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let indices: IndexMap<&str, NodeIndex> = chart
        .nodes()
        .map(|node| (node.id(), graph.add_node(node.id())))
        .collect();
    for edge in chart.edges() {
        if let (Some(&from), Some(&to)) = (indices.get(edge.from()), indices.get(edge.to())) {
            graph.add_edge(from, to, ());
        }
    }

    let mut ranks: IndexMap<&str, usize> = indices.keys().map(|id| (*id, 0)).collect();
    let condensed = condensation(graph, true);
    let order = match toposort(&condensed, None) {
        Ok(order) => order,
        Err(cycle) => {
            debug!(node = cycle.node_id().index(); "Condensed flowchart is not acyclic");
            return ranks;
        }
    };

    let mut component_ranks = vec![0usize; condensed.node_count()];
    for component in order {
        let rank = component_ranks[component.index()];
        for next in condensed.neighbors(component) {
            let next_rank = &mut component_ranks[next.index()];
            *next_rank = (*next_rank).max(rank + 1);
        }
        for id in &condensed[component] {
            if let Some(node_rank) = ranks.get_mut(id) {
                *node_rank = rank;
            }
        }
    }

    ranks
}

pub(super) fn layout_flowchart(chart: &Flowchart) -> FlowchartLayout<'_> {
    let ranks = ranks(chart);
    let max_rank = ranks.values().copied().max().unwrap_or(0);
    let cell = chart
        .nodes()
        .map(node_size)
        .fold(Size::new(MIN_NODE_WIDTH, NODE_HEIGHT), Size::max);
    let direction = chart.direction();

    let mut next_slot = vec![0usize; max_rank + 1];
    let nodes: Vec<PlacedNode<'_>> = chart
        .nodes()
        .map(|node| {
            let rank = ranks.get(node.id()).copied().unwrap_or(0);
            let level = if direction.is_reversed() {
                max_rank - rank
            } else {
                rank
            };
            let slot = next_slot[rank];
            next_slot[rank] += 1;

            let (level, slot) = (level as f32, slot as f32);
            let center = if direction.is_vertical() {
                Point::new(
                    slot * (cell.width() + NODE_GAP) + cell.width() / 2.0,
                    level * (cell.height() + RANK_GAP) + cell.height() / 2.0,
                )
            } else {
                Point::new(
                    level * (cell.width() + RANK_GAP) + cell.width() / 2.0,
                    slot * (cell.height() + NODE_GAP) + cell.height() / 2.0,
                )
            };
            PlacedNode {
                node,
                bounds: center.to_bounds(node_size(node)),
            }
        })
        .collect();

    let edges = chart
        .edges()
        .iter()
        .filter_map(|edge| {
            let from = nodes[chart.node_index(edge.from())?].bounds;
            let to = nodes[chart.node_index(edge.to())?].bounds;
            let path = if edge.from() == edge.to() {
                EdgePath::Loop(from)
            } else {
                EdgePath::Straight {
                    start: boundary_point(from, to.center()),
                    end: boundary_point(to, from.center()),
                }
            };
            Some(PlacedEdge { edge, path })
        })
        .collect();

    trace!(max_rank, nodes = nodes.len(); "Flowchart placed");
    FlowchartLayout { nodes, edges }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PlacedParticipant<'a> {
    pub participant: &'a Participant,
    /// Header box at the top of the lifeline.
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PlacedMessage<'a> {
    pub message: &'a Message,
    pub y: f32,
    pub from_x: f32,
    pub to_x: f32,
}

#[derive(Debug, Clone, Default)]
pub(super) struct SequenceLayout<'a> {
    pub participants: Vec<PlacedParticipant<'a>>,
    pub messages: Vec<PlacedMessage<'a>>,
    /// Y coordinate where lifelines stop.
    pub lifeline_end: f32,
}

impl SequenceLayout<'_> {
    pub fn bounds(&self) -> Bounds {
        let bottom = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(0.0, self.lifeline_end));
        self.participants
            .iter()
            .fold(bottom, |acc, placed| acc.merge(&placed.bounds))
    }
}

pub(super) fn layout_sequence(sequence: &Sequence) -> SequenceLayout<'_> {
    let width = sequence
        .participants()
        .map(|participant| label_size(participant.label()).width())
        .fold(MIN_NODE_WIDTH, f32::max);
    let column = |index: usize| index as f32 * (width + NODE_GAP) + width / 2.0;

    let participants = sequence
        .participants()
        .enumerate()
        .map(|(index, participant)| PlacedParticipant {
            participant,
            bounds: Point::new(column(index), NODE_HEIGHT / 2.0)
                .to_bounds(Size::new(width, NODE_HEIGHT)),
        })
        .collect();

    let messages = sequence
        .messages()
        .iter()
        .enumerate()
        .filter_map(|(row, message)| {
            Some(PlacedMessage {
                message,
                y: NODE_HEIGHT + (row + 1) as f32 * MESSAGE_GAP,
                from_x: column(sequence.participant_index(message.from())?),
                to_x: column(sequence.participant_index(message.to())?),
            })
        })
        .collect();

    SequenceLayout {
        participants,
        messages,
        lifeline_end: NODE_HEIGHT + (sequence.messages().len() + 1) as f32 * MESSAGE_GAP,
    }
}
