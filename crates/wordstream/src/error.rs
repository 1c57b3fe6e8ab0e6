//! Error types for WordStream operations.
//!
//! - [`WordStreamError`] wraps every failure a pipeline run can report.
//! - [`LayoutError`] covers engine misuse, which is the only way a layout
//!   query can fail.
//! - [`InvalidWord`] is not returned as an error: bad records are clamped,
//!   logged, and collected so the rest of the dataset still lays out.

use std::io;

use thiserror::Error;

use crate::corpus::ParseError;

/// The main error type for WordStream operations.
///
/// # Diagnostic Variants
///
/// The `Corpus` variant carries span-labelled diagnostics together with the
/// source text they point into, for rich error reporting.
#[derive(Debug, Error)]
pub enum WordStreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Dataset error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("{err}")]
    Corpus { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl WordStreamError {
    /// Create a new `Corpus` error with the associated source text.
    pub fn new_corpus_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Corpus {
            err,
            src: src.into(),
        }
    }
}

/// Errors raised by the layout engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A query ran before required configuration was supplied, or the
    /// configuration cannot produce a layout.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A word record that was repaired before layout.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("word `{text}` in topic `{topic}` at step {time_step}: {issue}")]
pub struct InvalidWord {
    pub time_step: usize,
    pub topic: String,
    pub text: String,
    pub issue: WordIssue,
}

/// What was wrong with an [`InvalidWord`] and how it was repaired.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WordIssue {
    #[error("negative frequency {0} clamped to 0")]
    NegativeFrequency(i64),

    #[error("non-finite suddenness {0} clamped to epsilon")]
    NonFiniteSudden(f64),

    #[error("non-positive suddenness {0} clamped to epsilon")]
    NonPositiveSudden(f64),
}
