//! # Tessera Parser
//!
//! Splits assistant messages into typed segments and parses diagram
//! descriptions into the semantic model of `tessera-core`.
//!
//! ## Usage
//!
//! ```
//! # use tessera_parser::{ExtractConfig, extract, parse_diagram};
//! # use tessera_core::SegmentKind;
//! let message = "Here is the flow:\n```mermaid\nflowchart LR\nA-->B\n```\n";
//!
//! let extraction = extract(message, &ExtractConfig::default());
//! assert!(extraction.diagnostics().is_empty());
//!
//! let diagram = extraction
//!     .segments()
//!     .iter()
//!     .find(|segment| segment.kind() == SegmentKind::DiagramBlock)
//!     .map(|segment| parse_diagram(segment.payload()));
//! assert!(matches!(diagram, Some(Ok(_))));
//! ```

mod diagram;
pub mod error;
mod extract;
mod fence;

pub use diagram::parse_diagram;
pub use extract::{ExtractConfig, Extraction, extract, extract_segments};

pub use tessera_core::Span;
