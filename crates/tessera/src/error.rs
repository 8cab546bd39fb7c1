//! Error types for Tessera operations.
//!
//! Rendering a message never fails: unrenderable diagrams become placeholders
//! inside the rendered view. [`TesseraError`] covers the operations around
//! it, such as loading configuration, checking diagrams up front and
//! exporting the result.

use std::io;

use thiserror::Error;

use tessera_parser::error::ParseError;

/// The main error type for Tessera operations.
///
/// # Diagnostic Variants
///
/// The `Diagram` variant carries the parser diagnostics together with the
/// diagram description they point into, so that callers can render source
/// snippets.
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{err}")]
    Diagram { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl TesseraError {
    /// Create a new `Diagram` error with the diagram description it refers to.
    pub fn new_diagram_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Diagram {
            err,
            src: src.into(),
        }
    }
}
