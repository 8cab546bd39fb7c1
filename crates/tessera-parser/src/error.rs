//! Error and diagnostic system for the Tessera parser.
//!
//! - Codes for documentation and searchability ([`ErrorCode`])
//! - Multiple labeled spans per diagnostic ([`Label`])
//! - Severity levels ([`Severity`])
//! - A collector for accumulating several diagnostics in one pass
//!
//! Segment extraction never fails: it only produces warnings, which are
//! returned next to the segments. Diagram parsing fails with a
//! [`ParseError`] holding every error found.
//!
//! # Example
//!
//! ```
//! # use tessera_parser::error::{Diagnostic, ErrorCode};
//! # use tessera_parser::Span;
//!
//! let diag = Diagnostic::warning("fence is never closed")
//!     .with_code(ErrorCode::W001)
//!     .with_label(Span::new(6..15), "unterminated fence")
//!     .with_help("add a closing ``` line");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
