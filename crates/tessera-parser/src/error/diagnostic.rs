//! The core diagnostic type.
//!
//! A [`Diagnostic`] is a single error or warning with an optional code,
//! labeled source spans and help text.

use std::fmt;

use tessera_core::Span;

use crate::error::{Severity, error_code::ErrorCode, label::Label};

/// A diagnostic message with source location information.
///
/// Spans are byte offsets into the text that was being processed: the whole
/// message for extraction warnings, the diagram body for diagram errors.
///
/// # Example
///
/// ```text
/// warning[W001]: fence is never closed
///   |
/// 3 | ```python
///   | ^^^^^^^^^^ unterminated fence
///   |
///   = help: add a line containing only ``` after the code
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tessera_parser::error::{Diagnostic, ErrorCode};
    /// # use tessera_parser::Span;
    ///
    /// let diag = Diagnostic::error("unsupported diagram type `pie`")
    ///     .with_code(ErrorCode::E101)
    ///     .with_label(Span::new(0..3), "not supported")
    ///     .with_help("use `flowchart` or `sequenceDiagram`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "warning[W001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::warning("fence is never closed");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.message(), "fence is never closed");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.primary_span().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::warning("fence inside block body")
            .with_code(ErrorCode::W002)
            .with_secondary_label(Span::new(0..40), "block starts here")
            .with_label(Span::new(12..15), "nested fence")
            .with_help("nested fences are not supported");

        assert_eq!(diag.code(), Some(ErrorCode::W002));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(12..15)));
        assert_eq!(diag.help(), Some("nested fences are not supported"));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unsupported diagram type `pie`").with_code(ErrorCode::E101);

        assert_eq!(diag.to_string(), "error[E101]: unsupported diagram type `pie`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("fence is never closed");

        assert_eq!(diag.to_string(), "warning: fence is never closed");
    }
}
