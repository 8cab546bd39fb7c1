//! Error codes for the Tessera diagnostic system.
//!
//! Codes are organized by phase:
//! - `W0xx` - Segment extraction warnings
//! - `E1xx` - Diagram description errors

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Extraction Warnings (W0xx)
    // =========================================================================
    /// Unterminated fence.
    ///
    /// An opening fence has no closing fence after it. The fence and the
    /// rest of the message are kept as plain text.
    W001,

    /// Nested fence.
    ///
    /// A fence marker appears inside a block body. Nested fences are not
    /// supported; the block ends at the first closing fence.
    W002,

    // =========================================================================
    // Diagram Errors (E1xx)
    // =========================================================================
    /// Missing diagram header.
    ///
    /// The diagram description is blank.
    E100,

    /// Unsupported diagram type.
    ///
    /// The header names a diagram type the renderer does not draw.
    E101,

    /// Invalid flowchart direction.
    ///
    /// Valid directions are `TD`, `TB`, `BT`, `LR` and `RL`.
    E102,

    /// Malformed statement.
    ///
    /// A line in the diagram body could not be parsed.
    E103,

    /// Empty diagram.
    ///
    /// The header is present but no node, edge or message follows it.
    E104,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "W001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::W001 => "unterminated fence",
            ErrorCode::W002 => "nested fence",
            ErrorCode::E100 => "missing diagram header",
            ErrorCode::E101 => "unsupported diagram type",
            ErrorCode::E102 => "invalid flowchart direction",
            ErrorCode::E103 => "malformed statement",
            ErrorCode::E104 => "empty diagram",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::W001.to_string(), "W001");
        assert_eq!(ErrorCode::E103.to_string(), "E103");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::W001.description(), "unterminated fence");
        assert_eq!(ErrorCode::E101.description(), "unsupported diagram type");
    }
}
