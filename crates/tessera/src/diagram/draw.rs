//! SVG drawing of placed diagrams.

use svg::{
    Document,
    node::element::{self as svg_element, Definitions, Marker, Path},
};

use tessera_core::{
    color::Color,
    diagram::{EdgeStyle, NodeShape},
    geometry::{Bounds, Insets, Point},
};

use super::layout::{EdgePath, FlowchartLayout, PlacedEdge, PlacedNode, SequenceLayout};
use crate::config::Palette;

const FONT_FAMILY: &str = "ui-sans-serif, system-ui, sans-serif";
const FONT_SIZE: f32 = 14.0;
const MARGIN: f32 = 20.0;
const ARROW_MARKER: &str = "arrow";
const OPEN_ARROW_MARKER: &str = "arrow-open";

/// Colors used to draw one diagram.
#[derive(Debug, Clone, Copy)]
pub(super) struct Style<'a> {
    palette: Palette,
    background: Option<&'a Color>,
}

impl<'a> Style<'a> {
    pub fn new(palette: Palette, background: Option<&'a Color>) -> Self {
        Self {
            palette,
            background,
        }
    }

    fn background(&self) -> svg::node::Value {
        match self.background {
            Some(color) => color.into(),
            None => self.palette.background.into(),
        }
    }
}

/// Creates the arrow head markers referenced by edges and messages.
fn marker_definitions(palette: Palette) -> Definitions {
    let filled = Marker::new()
        .set("id", ARROW_MARKER)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 7)
        .set("markerHeight", 7)
        .set("orient", "auto")
        .add(
            Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", palette.foreground),
        );

    let open = Marker::new()
        .set("id", OPEN_ARROW_MARKER)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 7)
        .set("markerHeight", 7)
        .set("orient", "auto")
        .add(
            Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10")
                .set("fill", "none")
                .set("stroke", palette.foreground),
        );

    Definitions::new().add(filled).add(open)
}

/// Creates an empty document sized to `content` plus a margin.
fn document(content: Bounds, style: &Style<'_>) -> Document {
    let palette = style.palette;
    let view = content.add_padding(Insets::uniform(MARGIN));
    let background = svg_element::Rectangle::new()
        .set("x", view.min_x())
        .set("y", view.min_y())
        .set("width", view.width())
        .set("height", view.height())
        .set("fill", style.background());

    Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                view.min_x(),
                view.min_y(),
                view.width(),
                view.height()
            ),
        )
        .set("width", view.width())
        .set("height", view.height())
        .add(marker_definitions(palette))
        .add(background)
}

fn label(text: &str, position: Point, palette: Palette) -> svg_element::Text {
    svg_element::Text::new(text)
        .set("x", position.x())
        .set("y", position.y())
        .set("text-anchor", "middle")
        .set("dominant-baseline", "middle")
        .set("font-family", FONT_FAMILY)
        .set("font-size", FONT_SIZE)
        .set("fill", palette.foreground)
}

fn node_outline(shape: NodeShape, bounds: Bounds) -> Box<dyn svg::Node> {
    let center = bounds.center();
    match shape {
        NodeShape::Rectangle | NodeShape::Rounded => {
            let radius = if shape == NodeShape::Rounded { 12.0 } else { 2.0 };
            svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("rx", radius)
                .into()
        }
        NodeShape::Circle => svg_element::Circle::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("r", bounds.width() / 2.0)
            .into(),
        NodeShape::Diamond => svg_element::Polygon::new()
            .set(
                "points",
                format!(
                    "{},{} {},{} {},{} {},{}",
                    center.x(),
                    bounds.min_y(),
                    bounds.max_x(),
                    center.y(),
                    center.x(),
                    bounds.max_y(),
                    bounds.min_x(),
                    center.y()
                ),
            )
            .into(),
        NodeShape::Database => {
            let rx = bounds.width() / 2.0;
            let ry = 6.0;
            let (left, right) = (bounds.min_x(), bounds.max_x());
            let (top, bottom) = (bounds.min_y() + ry, bounds.max_y() - ry);
            Path::new()
                .set(
                    "d",
                    format!(
                        "M {left} {top} A {rx} {ry} 0 0 0 {right} {top} A {rx} {ry} 0 0 0 {left} {top} \
                         L {left} {bottom} A {rx} {ry} 0 0 0 {right} {bottom} L {right} {top}"
                    ),
                )
                .into()
        }
    }
}

fn draw_node(placed: &PlacedNode<'_>, palette: Palette) -> svg_element::Group {
    svg_element::Group::new()
        .set("class", "node")
        .set("fill", palette.code_background)
        .set("stroke", palette.foreground)
        .set("stroke-width", 1.5)
        .add(node_outline(placed.node.shape(), placed.bounds))
        .add(label(placed.node.label(), placed.bounds.center(), palette))
}

fn draw_edge(placed: &PlacedEdge<'_>, palette: Palette) -> svg_element::Group {
    let edge = placed.edge;
    let (data, label_position) = match placed.path {
        EdgePath::Straight { start, end } => (
            format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
            start.midpoint(end),
        ),
        EdgePath::Loop(bounds) => {
            let (x, y) = (bounds.max_x(), bounds.center().y());
            (
                format!(
                    "M {x} {} C {} {} {} {} {x} {}",
                    y - 8.0,
                    x + 36.0,
                    y - 30.0,
                    x + 36.0,
                    y + 30.0,
                    y + 8.0
                ),
                Point::new(x + 36.0, y),
            )
        }
    };

    let mut line = Path::new()
        .set("d", data)
        .set("fill", "none")
        .set("stroke", palette.foreground)
        .set(
            "stroke-width",
            if edge.style() == EdgeStyle::Thick { 3.0 } else { 1.5 },
        );
    if edge.style() == EdgeStyle::Dotted {
        line = line.set("stroke-dasharray", "4 3");
    }
    if edge.style().has_arrow_head() {
        line = line.set("marker-end", format!("url(#{ARROW_MARKER})"));
    }

    let mut group = svg_element::Group::new().set("class", "edge").add(line);
    if let Some(text) = edge.label() {
        group = group.add(label(text, label_position, palette).set("fill", palette.muted));
    }
    group
}

/// Draw a placed flowchart.
pub(super) fn flowchart_document(layout: &FlowchartLayout<'_>, style: &Style<'_>) -> Document {
    let palette = style.palette;
    let mut doc = document(layout.bounds(), style);
    for edge in &layout.edges {
        doc = doc.add(draw_edge(edge, palette));
    }
    for node in &layout.nodes {
        doc = doc.add(draw_node(node, palette));
    }
    doc
}

/// Draw a placed sequence diagram.
pub(super) fn sequence_document(layout: &SequenceLayout<'_>, style: &Style<'_>) -> Document {
    let palette = style.palette;
    let mut doc = document(layout.bounds(), style);

    for placed in &layout.participants {
        let bounds = placed.bounds;
        let lifeline = svg_element::Line::new()
            .set("x1", bounds.center().x())
            .set("y1", bounds.max_y())
            .set("x2", bounds.center().x())
            .set("y2", layout.lifeline_end)
            .set("stroke", palette.border)
            .set("stroke-dasharray", "5 4");
        let radius = if placed.participant.is_actor() {
            bounds.height() / 2.0
        } else {
            2.0
        };
        let header = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", radius)
            .set("fill", palette.code_background)
            .set("stroke", palette.foreground);

        doc = doc.add(
            svg_element::Group::new()
                .set("class", "participant")
                .add(lifeline)
                .add(header)
                .add(label(placed.participant.label(), bounds.center(), palette)),
        );
    }

    for placed in &layout.messages {
        let message = placed.message;
        let (data, text_x) = if message.from() == message.to() {
            let (x, y) = (placed.from_x, placed.y);
            (
                format!("M {x} {} L {} {} L {} {y} L {x} {y}", y - 14.0, x + 30.0, y - 14.0, x + 30.0),
                x + 34.0,
            )
        } else {
            (
                format!("M {} {} L {} {}", placed.from_x, placed.y, placed.to_x, placed.y),
                (placed.from_x + placed.to_x) / 2.0,
            )
        };
        let marker = if message.style().has_arrow_head() {
            ARROW_MARKER
        } else {
            OPEN_ARROW_MARKER
        };
        let mut line = Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("stroke", palette.foreground)
            .set("marker-end", format!("url(#{marker})"));
        if message.style().is_dashed() {
            line = line.set("stroke-dasharray", "6 4");
        }

        let mut group = svg_element::Group::new().set("class", "message").add(line);
        if !message.text().is_empty() {
            let text_y = placed.y - 10.0;
            group = group.add(label(message.text(), Point::new(text_x, text_y), palette));
        }
        doc = doc.add(group);
    }

    doc
}
