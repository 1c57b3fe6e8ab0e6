//! Error codes for corpus diagnostics.
//!
//! Error codes are organized by stage:
//! - `E0xx` - Field syntax errors
//! - `E1xx` - Record shape errors
//! - `E2xx` - Column and value errors
//! - `E3xx` - Document errors

use std::fmt;

/// Error codes for categorizing corpus diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unterminated quoted field.
    ///
    /// A field was opened with a quote but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A quoted field was followed by something other than a delimiter or a
    /// line break, or a line ended with a bare carriage return.
    E002,

    /// Missing field.
    ///
    /// A record has fewer fields than required.
    E100,

    /// Extra fields.
    ///
    /// A record has more fields than the header or format allows.
    E101,

    /// Missing required column.
    ///
    /// The header row does not name a `date` or `text` column.
    E200,

    /// Invalid sentiment value.
    ///
    /// A sentiment field is not a finite number.
    E201,

    /// Invalid JSON document.
    ///
    /// The input is not an array of document objects.
    E300,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated quoted field",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E100 => "missing field",
            ErrorCode::E101 => "extra fields",
            ErrorCode::E200 => "missing required column",
            ErrorCode::E201 => "invalid sentiment value",
            ErrorCode::E300 => "invalid JSON document",
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
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated quoted field");
        assert_eq!(ErrorCode::E300.description(), "invalid JSON document");
    }
}
