//! Tessera Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Tessera parser
//! and renderer:
//!
//! - **Spans**: Byte ranges into a message ([`span::Span`])
//! - **Segments**: Typed pieces of a decomposed message ([`segment::Segment`])
//! - **Diagrams**: Semantic model of diagram descriptions ([`diagram`] module)
//! - **Colors**: Parsed CSS colors for themes ([`color::Color`])
//! - **Geometry**: Basic geometric types for placement ([`geometry`] module)

pub mod color;
pub mod diagram;
pub mod geometry;
pub mod segment;
pub mod span;

pub use segment::{Segment, SegmentKind};
pub use span::Span;
