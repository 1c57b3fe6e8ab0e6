//! Raw document readers.
//!
//! Line-oriented formats are split into records by a small winnow grammar:
//!
//! ```text
//! records := record (line_end record)* eof
//! record  := field (DELIMITER field)*
//! field   := quoted | bare
//! quoted  := '"' ( '""' | [^"] )* '"'        (tables only)
//! bare    := [^DELIMITER \r \n]*
//! ```
//!
//! A malformed record does not stop the reader. It is reported and the
//! reader resumes on the next line, so one pass reports every bad record.

use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, eof, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{none_of, take_till, take_while},
};

use super::{
    Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
};

/// One raw document before tokenization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub date: String,
    pub text: String,
    pub category: Option<String>,
    pub sentiment: Option<f64>,
}

impl Document {
    pub fn new(date: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            text: text.into(),
            category: None,
            sentiment: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

/// Supported corpus file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `date|text|category` lines.
    Text,
    /// Comma separated with a header row.
    Csv,
    /// Tab separated with a header row.
    Tsv,
    /// An array of `{date, text, category?, sentiment?}` objects.
    Json,
}

impl InputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "txt" | "text" => Some(InputFormat::Text),
            "csv" => Some(InputFormat::Csv),
            "tsv" => Some(InputFormat::Tsv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }

    fn default_delimiter(self) -> char {
        match self {
            InputFormat::Text => '|',
            InputFormat::Tsv => '\t',
            InputFormat::Csv | InputFormat::Json => ',',
        }
    }
}

/// Reads every document of `source`.
///
/// `delimiter` overrides the delimiter implied by `format`; it is ignored for
/// JSON.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per malformed record.
///
/// # Examples
///
/// ```
/// # use wordstream::corpus::{InputFormat, read_documents};
/// let source = "date,text,category\n2020-01-05,\"Storms, floods\",weather\n";
/// let documents = read_documents(source, InputFormat::Csv, None).expect("valid csv");
///
/// assert_eq!(documents.len(), 1);
/// assert_eq!(documents[0].text, "Storms, floods");
/// assert_eq!(documents[0].category.as_deref(), Some("weather"));
/// ```
pub fn read_documents(
    source: &str,
    format: InputFormat,
    delimiter: Option<char>,
) -> Result<Vec<Document>, ParseError> {
    let delimiter = delimiter.unwrap_or(format.default_delimiter());
    let documents = match format {
        InputFormat::Json => read_json(source)?,
        InputFormat::Text => read_lines(
            source,
            Dialect {
                delimiter,
                quoting: false,
            },
        )?,
        InputFormat::Csv | InputFormat::Tsv => read_table(
            source,
            Dialect {
                delimiter,
                quoting: true,
            },
        )?,
    };
    debug!(format:? = format, documents = documents.len(); "Documents read");
    Ok(documents)
}

/// Rich diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReaderDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<ReaderDiagnostic>>;

#[derive(Debug, Clone, Copy)]
struct Dialect {
    delimiter: char,
    quoting: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Field {
    value: String,
    span: Span,
}

impl Field {
    fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// The trimmed value, or `None` when blank.
    fn non_blank(&self) -> Option<&str> {
        Some(self.trimmed()).filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
    fields: Vec<Field>,
    span: Span,
}

/// Parse a quoted field; `""` inside the quotes is an escaped quote.
fn quoted_field(input: &mut Input<'_>) -> IResult<String> {
    let start = input.current_token_start();
    let content = repeat(0.., alt(("\"\"".value('"'), none_of('"')))).fold(
        String::new,
        |mut acc: String, ch: char| {
            acc.push(ch);
            acc
        },
    );

    preceded(
        '"',
        cut_err(terminated(content, '"')).context(ReaderDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated quoted field",
            help: Some("add a closing `\"` and escape inner quotes as `\"\"`"),
            start,
        }),
    )
    .parse_next(input)
}

/// Parse an unquoted field up to the next delimiter or line break.
fn bare_field(input: &mut Input<'_>, delimiter: char) -> IResult<String> {
    take_while(0.., |c: char| c != delimiter && c != '\n' && c != '\r')
        .map(str::to_string)
        .parse_next(input)
}

fn field<'a>(input: &mut Input<'a>, dialect: Dialect) -> IResult<Field> {
    let start = input.current_token_start();
    let value = if dialect.quoting {
        alt((quoted_field, |i: &mut Input<'a>| bare_field(i, dialect.delimiter)))
            .parse_next(input)?
    } else {
        bare_field(input, dialect.delimiter)?
    };
    let end = input.current_token_start();

    Ok(Field {
        value,
        span: Span::new(start..end),
    })
}

fn record(input: &mut Input<'_>, dialect: Dialect) -> IResult<Vec<Field>> {
    let mut fields = vec![field(input, dialect)?];
    loop {
        let separator: IResult<Option<char>> = opt(dialect.delimiter).parse_next(input);
        if separator?.is_none() {
            break;
        }
        fields.push(field(input, dialect)?);
    }
    Ok(fields)
}

fn line_end(input: &mut Input<'_>) -> IResult<()> {
    let start = input.current_token_start();
    alt(("\r\n".void(), "\n".void(), eof.void()))
        .context(ReaderDiagnostic {
            code: ErrorCode::E002,
            message: "unexpected character after field",
            help: Some("quote fields that contain quotes or line breaks"),
            start,
        })
        .parse_next(input)
}

fn skip_line(input: &mut Input<'_>) {
    let _: IResult<()> = (take_till(0.., '\n'), opt('\n')).void().parse_next(input);
}

/// Convert an ErrMode and error position to a Diagnostic.
fn convert_err_mode(
    err: ErrMode<ContextError<ReaderDiagnostic>>,
    error_pos: usize,
    source_len: usize,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let (code, message, help, start) = match context_error.context().next() {
        Some(context) => (context.code, context.message, context.help, context.start),
        None => (ErrorCode::E002, "unexpected character", None, error_pos),
    };
    let end = error_pos.max(start + 1).min(source_len).max(start);

    let diagnostic = Diagnostic::error(message)
        .with_code(code)
        .with_label(Span::new(start..end), code.description());
    match help {
        Some(help) => diagnostic.with_help(help),
        None => diagnostic,
    }
}

/// Splits `source` into non-blank records.
fn read_records(source: &str, dialect: Dialect) -> Result<Vec<Record>, ParseError> {
    let mut input = LocatingSlice::new(source);
    let mut records = Vec::new();
    let mut diagnostics = DiagnosticCollector::new();

    while !input.is_empty() {
        let start = input.current_token_start();
        let parsed = record(&mut input, dialect).and_then(|fields| {
            let end = input.current_token_start();
            line_end(&mut input).map(|()| (fields, end))
        });

        match parsed {
            Ok((fields, end)) => {
                if fields.iter().any(|field| !field.trimmed().is_empty()) {
                    records.push(Record {
                        fields,
                        span: Span::new(start..end),
                    });
                }
            }
            Err(err) => {
                let error_pos = input.current_token_start();
                diagnostics.emit(convert_err_mode(err, error_pos, source.len()));
                skip_line(&mut input);
            }
        }
    }

    diagnostics.finish()?;
    Ok(records)
}

/// Text lines are read leniently: a line without a text field is taken as
/// text only, and fields past the third are dropped with a warning.
fn read_lines(source: &str, dialect: Dialect) -> Result<Vec<Document>, ParseError> {
    let records = read_records(source, dialect)?;
    let mut documents = Vec::with_capacity(records.len());

    for record in &records {
        let document = match record.fields.as_slice() {
            [] => continue,
            [text] => {
                warn!(offset = record.span.start(); "Line has no date field");
                Document::new(text.trimmed(), text.trimmed())
            }
            [date, text] => Document::new(date.trimmed(), text.trimmed()),
            [date, text, category, extra @ ..] => {
                if !extra.is_empty() {
                    warn!(
                        offset = record.span.start(),
                        fields = record.fields.len();
                        "Ignoring fields past the category"
                    );
                }
                let mut document = Document::new(date.trimmed(), text.trimmed());
                document.category = category.non_blank().map(str::to_string);
                document
            }
        };
        documents.push(document);
    }

    Ok(documents)
}

/// Column positions resolved from a header row.
#[derive(Debug)]
struct Columns {
    date: usize,
    text: usize,
    category: Option<usize>,
    sentiment: Option<usize>,
}

impl Columns {
    fn from_header(header: &Record) -> Result<Self, Diagnostic> {
        let position = |name: &str| {
            header.fields.iter().position(|field| {
                field
                    .trimmed()
                    .trim_start_matches('\u{feff}')
                    .eq_ignore_ascii_case(name)
            })
        };

        let missing = |name: &str| {
            Diagnostic::error(format!("missing required column `{name}`"))
                .with_code(ErrorCode::E200)
                .with_label(header.span, "header row")
                .with_help("the header must name `date` and `text` columns")
        };

        Ok(Self {
            date: position("date").ok_or_else(|| missing("date"))?,
            text: position("text").ok_or_else(|| missing("text"))?,
            category: position("category"),
            sentiment: position("sentiment"),
        })
    }
}

fn read_table(source: &str, dialect: Dialect) -> Result<Vec<Document>, ParseError> {
    let records = read_records(source, dialect)?;
    let Some((header, rows)) = records.split_first() else {
        return Ok(Vec::new());
    };
    let columns = Columns::from_header(header)?;

    let mut diagnostics = DiagnosticCollector::new();
    let mut documents = Vec::with_capacity(rows.len());
    let width = header.fields.len();

    for row in rows {
        if row.fields.len() != width {
            let code = if row.fields.len() < width {
                ErrorCode::E100
            } else {
                ErrorCode::E101
            };
            diagnostics.emit(
                Diagnostic::error(format!(
                    "record has {} fields, expected {width}",
                    row.fields.len()
                ))
                .with_code(code)
                .with_label(row.span, "this row")
                .with_secondary_label(header.span, format!("header defines {width} columns"))
                .with_help("quote fields that contain the delimiter"),
            );
            continue;
        }

        let mut document = Document::new(
            row.fields[columns.date].trimmed(),
            row.fields[columns.text].trimmed(),
        );
        document.category = columns
            .category
            .and_then(|index| row.fields[index].non_blank())
            .map(str::to_string);

        if let Some(field) = columns.sentiment.map(|index| &row.fields[index]) {
            match field.non_blank().map(str::parse::<f64>) {
                None => {}
                Some(Ok(value)) if value.is_finite() => document.sentiment = Some(value),
                Some(_) => {
                    diagnostics.emit(
                        Diagnostic::error(format!(
                            "invalid sentiment value `{}`",
                            field.trimmed()
                        ))
                        .with_code(ErrorCode::E201)
                        .with_label(field.span, "expected a finite number"),
                    );
                    continue;
                }
            }
        }

        documents.push(document);
    }

    diagnostics.finish()?;
    Ok(documents)
}

#[derive(Deserialize)]
struct JsonDocument {
    date: JsonDate,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sentiment: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDate {
    Text(String),
    Number(i64),
}

fn read_json(source: &str) -> Result<Vec<Document>, ParseError> {
    let parsed: Vec<JsonDocument> = serde_json::from_str(source).map_err(|err| {
        let offset = byte_offset(source, err.line(), err.column());
        let end = (offset + 1).min(source.len());
        Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E300)
            .with_label(Span::new(offset..end), ErrorCode::E300.description())
            .with_help("expected an array of objects with `date` and `text` fields")
    })?;

    let documents = parsed
        .into_iter()
        .filter_map(|document| {
            let text = document.text?;
            let date = match document.date {
                JsonDate::Text(date) => date,
                JsonDate::Number(year) => year.to_string(),
            };
            Some(Document {
                date,
                text,
                category: document.category.filter(|category| !category.trim().is_empty()),
                sentiment: document.sentiment.filter(|value| value.is_finite()),
            })
        })
        .collect();
    Ok(documents)
}

/// Converts a 1-based line and column into a byte offset into `source`.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/b/tweets.CSV")),
            Some(InputFormat::Csv)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("news.txt")),
            Some(InputFormat::Text)
        );
        assert_eq!(InputFormat::from_path(Path::new("data.xlsx")), None);
        assert_eq!(InputFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_text_lines() {
        let source = "2020-01-01|Storm warning issued|weather\n\n2020-01-02|Markets rally\n";
        let documents = read_documents(source, InputFormat::Text, None).expect("valid");

        assert_eq!(
            documents,
            vec![
                Document::new("2020-01-01", "Storm warning issued").with_category("weather"),
                Document::new("2020-01-02", "Markets rally"),
            ]
        );
    }

    #[test]
    fn test_text_quotes_are_literal() {
        let source = "2020|\"Quoted\" she said|news";
        let documents = read_documents(source, InputFormat::Text, None).expect("valid");
        assert_eq!(documents[0].text, "\"Quoted\" she said");
    }

    #[test]
    fn test_text_lines_are_lenient() {
        let source = "2020-01-01|good news today|news\n2020-01-02|a|b|c|news\njust some text\n";
        let documents = read_documents(source, InputFormat::Text, None).expect("lenient");

        assert_eq!(
            documents,
            vec![
                Document::new("2020-01-01", "good news today").with_category("news"),
                Document::new("2020-01-02", "a").with_category("b"),
                Document::new("just some text", "just some text"),
            ]
        );
    }

    #[test]
    fn test_csv_quoting_and_escapes() {
        let source = "text,date\r\n\"He said \"\"hi\"\"\",2021-05-01\r\n\"multi\nline\",2021\r\n";
        let documents = read_documents(source, InputFormat::Csv, None).expect("valid");

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].text, "He said \"hi\"");
        assert_eq!(documents[0].date, "2021-05-01");
        assert_eq!(documents[1].text, "multi\nline");
        assert!(documents[1].category.is_none());
    }

    #[test]
    fn test_tsv_with_sentiment() {
        let source = "Date\tText\tCategory\tSentiment\n2020\tgood news\tpos\t0.75\n2020\tmeh\t\t\n";
        let documents = read_documents(source, InputFormat::Tsv, None).expect("valid");

        assert_eq!(documents[0].sentiment, Some(0.75));
        assert_eq!(documents[0].category.as_deref(), Some("pos"));
        assert_eq!(documents[1].sentiment, None);
        assert_eq!(documents[1].category, None);
    }

    #[test]
    fn test_delimiter_override() {
        let source = "date;text\n2020;semicolons, with commas\n";
        let documents = read_documents(source, InputFormat::Csv, Some(';')).expect("valid");
        assert_eq!(documents[0].text, "semicolons, with commas");
    }

    #[test]
    fn test_csv_missing_column() {
        let source = "when,text\n2020,hello\n";
        let err = read_documents(source, InputFormat::Csv, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E200]);
        assert!(err.to_string().contains("`date`"));
    }

    #[test]
    fn test_csv_collects_every_bad_row() {
        let source = "date,text\n2020,ok\n2020\n2020,a,b\n2021,fine\n";
        let err = read_documents(source, InputFormat::Csv, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E100, ErrorCode::E101]);
        assert!(!err.diagnostics()[0].labels()[1].is_primary());
    }

    #[test]
    fn test_csv_invalid_sentiment() {
        let source = "date,text,sentiment\n2020,hello,very\n";
        let err = read_documents(source, InputFormat::Csv, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E201]);
        let span = err.diagnostics()[0].labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "very");
    }

    #[test]
    fn test_csv_unterminated_quote() {
        let source = "date,text\n2020,\"never closed\n";
        let err = read_documents(source, InputFormat::Csv, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E001]);
        let span = err.diagnostics()[0].labels()[0].span();
        assert_eq!(span.start(), source.find('"').expect("quote"));
        assert_eq!(span.end(), source.len());
        assert!(err.diagnostics()[0].help().is_some());
    }

    #[test]
    fn test_csv_garbage_after_quote() {
        let source = "date,text\n2020,\"quoted\"tail\n2021,next\n";
        let err = read_documents(source, InputFormat::Csv, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E002]);
        let span = err.diagnostics()[0].labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "t");
    }

    #[test]
    fn test_empty_table() {
        assert!(read_documents("", InputFormat::Csv, None).expect("valid").is_empty());
        assert!(read_documents("date,text\n", InputFormat::Csv, None).expect("valid").is_empty());
    }

    #[test]
    fn test_json_documents() {
        let source = r#"[
            {"date": "2020-02-01", "text": "alpha", "category": "a", "sentiment": -0.5},
            {"date": 2019, "text": "beta"},
            {"date": "2020", "text": null}
        ]"#;
        let documents = read_documents(source, InputFormat::Json, None).expect("valid");

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].sentiment, Some(-0.5));
        assert_eq!(documents[1].date, "2019");
        assert_eq!(documents[1].category, None);
    }

    #[test]
    fn test_json_error_has_span() {
        let source = "[\n  {\"date\": \"2020\", \"text\": }\n]";
        let err = read_documents(source, InputFormat::Json, None).expect_err("invalid");

        assert_eq!(codes(&err), vec![ErrorCode::E300]);
        let span = err.diagnostics()[0].labels()[0].span();
        assert!(span.start() > source.find('{').expect("brace"));
        assert!(span.end() <= source.len());
    }

    #[test]
    fn test_byte_offset() {
        let source = "ab\ncde\nf";
        assert_eq!(byte_offset(source, 1, 1), 0);
        assert_eq!(byte_offset(source, 2, 2), 4);
        assert_eq!(byte_offset(source, 3, 1), 7);
        assert_eq!(byte_offset(source, 9, 9), source.len());
    }
}
