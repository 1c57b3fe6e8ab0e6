//! Corpus preprocessing: raw dated documents to a [`Dataset`].
//!
//! The pipeline reads records ([`read_documents`]), extracts distinct words
//! per document ([`Tokenizer`]), and aggregates them per period and category
//! ([`Preprocessor`]).
//!
//! # Example
//!
//! ```
//! # use wordstream::config::CorpusConfig;
//! # use wordstream::corpus::{InputFormat, Preprocessor, read_documents};
//! let source = "2020-01-03|Flood waters rise|weather\n2020-02-11|Flood relief arrives|weather\n";
//! let documents = read_documents(source, InputFormat::Text, None).expect("valid corpus");
//! let dataset = Preprocessor::new(&CorpusConfig::default()).build(&documents, Some("floods"));
//!
//! assert_eq!(dataset.metadata.periods, vec!["2020-01", "2020-02"]);
//! let flood = dataset.data[1]
//!     .words_in("weather")
//!     .iter()
//!     .find(|word| word.text == "flood")
//!     .expect("flood was mentioned");
//! assert_eq!(flood.frequency, 1);
//! assert_eq!(flood.sudden, 1.0);
//! ```

mod builder;
mod error;
mod reader;
mod span;
mod tokenize;

use std::{ffi::OsStr, fs, path::Path};

use log::info;

pub use builder::{DEFAULT_CATEGORY, Preprocessor, period_of};
pub use error::{Diagnostic, ErrorCode, Label, ParseError};
pub use reader::{Document, InputFormat, read_documents};
pub use span::Span;
pub use tokenize::{STOPWORDS, Tokenizer, clean_text};

use crate::{WordStreamError, config::CorpusConfig, dataset::Dataset};

/// Reads a corpus file and preprocesses it into a [`Dataset`].
///
/// The format is picked from the file extension. The dataset is named after
/// the file stem.
///
/// # Errors
///
/// - [`WordStreamError::UnsupportedFormat`] for an unknown extension.
/// - [`WordStreamError::Io`] when the file cannot be read.
/// - [`WordStreamError::Corpus`] with every malformed record.
pub fn preprocess_file(
    path: impl AsRef<Path>,
    config: &CorpusConfig,
) -> Result<Dataset, WordStreamError> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)
        .ok_or_else(|| WordStreamError::UnsupportedFormat(path.display().to_string()))?;
    info!(path:? = path, format:? = format; "Preprocessing corpus");

    let source = fs::read_to_string(path)?;
    let documents = read_documents(&source, format, config.delimiter())
        .map_err(|err| WordStreamError::new_corpus_error(err, &source))?;

    let name = path.file_stem().and_then(OsStr::to_str);
    Ok(Preprocessor::new(config).build(&documents, name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_preprocess_csv_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        write!(
            file,
            "date,text,category\n2020-01-01,Volcano erupts,nature\n2020-01-09,\"Volcano ash, flights halted\",travel\n"
        )
        .expect("write");

        let dataset = preprocess_file(file.path(), &CorpusConfig::default()).expect("valid corpus");

        assert_eq!(dataset.metadata.total_documents, Some(2));
        assert_eq!(dataset.metadata.categories, vec!["nature", "travel"]);
        let volcano = &dataset.data[0].words_in("nature")[0];
        assert_eq!(volcano.text, "volcano");
        assert_eq!(volcano.frequency, 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = preprocess_file("corpus.xlsx", &CorpusConfig::default()).expect_err("unsupported");
        assert!(matches!(err, WordStreamError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_corpus_error_keeps_source() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        write!(file, "date,text\n2020-01-01,fine\nbroken line\n").expect("write");

        let err = preprocess_file(file.path(), &CorpusConfig::default()).expect_err("invalid");
        let WordStreamError::Corpus { err, src } = err else {
            panic!("expected a corpus error");
        };
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
        assert!(src.contains("broken line"));
    }
}
