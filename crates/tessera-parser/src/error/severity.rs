//! Severity levels for diagnostics.
//!
//! Extraction only ever reports warnings; diagram parsing reports errors.

use std::fmt;

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] means the input could not be turned into a result
/// - [`Severity::Warning`] means the input was accepted in a degraded form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The input was rejected.
    ///
    /// For a diagram description this means no diagram is produced and the
    /// renderer shows its error placeholder instead.
    Error,

    /// The input was accepted but not in the form it was probably meant.
    ///
    /// An unterminated fence, for example, is kept as plain text.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_predicates() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Error.is_warning());
        assert!(Severity::Warning.is_warning());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
