//! Diagnostics for corpus record parsing.
//!
//! Malformed records do not stop the reader: every problem is collected as a
//! [`Diagnostic`] with an [`ErrorCode`] and labelled source spans, and the
//! whole batch is returned as one [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use wordstream::corpus::{Diagnostic, ErrorCode, Span};
//! let diag = Diagnostic::error("record has 2 fields, expected 3")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(20..34), "this row")
//!     .with_secondary_label(Span::new(0..18), "header defines 3 columns")
//!     .with_help("quote fields that contain the delimiter");
//! assert_eq!(diag.to_string(), "error[E101]: record has 2 fields, expected 3");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
