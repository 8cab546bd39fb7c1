//! Exporters for rendered messages.
//!
//! An [`Exporter`] turns a [`RenderedMessage`] into a document. Exporters
//! read the message as it is: a diagram still pending is written as pending,
//! so callers usually [`RenderedMessage::resolve`] first.

pub mod html;
pub mod text;

pub use html::HtmlExporter;
pub use text::TextExporter;

use crate::{TesseraError, render::RenderedMessage};

/// Writes a rendered message in one output format.
pub trait Exporter {
    /// Export `message` to a document string.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Export`] if the document cannot be written.
    fn export(&self, message: &RenderedMessage) -> Result<String, TesseraError>;
}

fn write_error(err: std::fmt::Error) -> TesseraError {
    TesseraError::Export(Box::new(err))
}
