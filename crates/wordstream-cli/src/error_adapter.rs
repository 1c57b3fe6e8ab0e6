//! Rendering of [`WordStreamError`] through miette.
//!
//! A corpus error becomes one [`Report`] per malformed record, each labelled
//! against the corpus text. Every other error becomes a single report with a
//! `wordstream::*` code and no source snippet.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use wordstream::{
    WordStreamError,
    corpus::{Diagnostic, Label},
};

/// One error as the CLI prints it.
#[derive(Debug)]
pub struct Report<'a> {
    message: String,
    code: Option<String>,
    help: Option<&'a str>,
    labels: Vec<LabeledSpan>,
    src: Option<&'a str>,
    cause: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Report<'a> {
    fn from_diagnostic(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self {
            message: diag.message().to_string(),
            code: diag.code().map(|code| code.to_string()),
            help: diag.help(),
            labels: diag.labels().iter().map(labeled_span).collect(),
            src: Some(src),
            cause: None,
        }
    }

    fn from_error(err: &'a WordStreamError) -> Self {
        let (code, help) = match err {
            WordStreamError::Io(_) => ("wordstream::io", None),
            WordStreamError::Dataset(_) => ("wordstream::dataset", None),
            WordStreamError::Layout(_) => ("wordstream::layout", None),
            WordStreamError::Corpus { .. } => ("wordstream::corpus", None),
            WordStreamError::UnsupportedFormat(_) => (
                "wordstream::format",
                Some("corpus files must end in .txt, .csv, .tsv or .json"),
            ),
        };
        Self {
            message: err.to_string(),
            code: Some(code.to_string()),
            help,
            labels: Vec::new(),
            src: None,
            cause: err.source(),
        }
    }
}

fn labeled_span(label: &Label) -> LabeledSpan {
    let span = SourceSpan::new(label.span().start().into(), label.span().len());
    let message = Some(label.message().to_string());
    if label.is_primary() {
        LabeledSpan::new_primary_with_span(message, span)
    } else {
        LabeledSpan::new_with_span(message, span)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for Report<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.code
            .as_deref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.help.map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

/// Splits `err` into the reports the CLI prints, one per corpus diagnostic.
pub fn reports(err: &WordStreamError) -> Vec<Report<'_>> {
    match err {
        WordStreamError::Corpus { err: parse_err, src } if !parse_err.diagnostics().is_empty() => {
            parse_err
                .diagnostics()
                .iter()
                .map(|diag| Report::from_diagnostic(diag, src))
                .collect()
        }
        _ => vec![Report::from_error(err)],
    }
}
