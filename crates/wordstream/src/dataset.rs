//! Dataset documents.
//!
//! A dataset is either a bare JSON array of periods or the envelope written
//! by the corpus preprocessor:
//!
//! ```json
//! {
//!   "metadata": { "dataset_name": "news", "total_periods": 2 },
//!   "data": [ { "date": "2024-01", "words": { "politics": [] } } ]
//! }
//! ```

use std::{fmt, fs, path::Path};

use log::{debug, info};
use serde::{
    Deserialize, Serialize,
    de::{
        MapAccess, SeqAccess, Visitor,
        value::{MapAccessDeserializer, SeqAccessDeserializer},
    },
};

use wordstream_core::model::Period;

use crate::WordStreamError;

/// Summary of a preprocessed dataset. Every field is optional on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_documents: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_periods: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_unique_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_model: Option<String>,
}

/// Periods together with optional metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub metadata: DatasetMetadata,
    pub data: Vec<Period>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    metadata: DatasetMetadata,
    data: Vec<Period>,
}

/// Dispatches on the document shape so field errors inside either form are
/// reported as they are.
struct DatasetVisitor;

impl<'de> Visitor<'de> for DatasetVisitor {
    type Value = Dataset;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of periods or a {metadata, data} object")
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let data = Vec::<Period>::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(Dataset::new(DatasetMetadata::default(), data))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Envelope { metadata, data } = Envelope::deserialize(MapAccessDeserializer::new(map))?;
        Ok(Dataset::new(metadata, data))
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DatasetVisitor)
    }
}

impl Dataset {
    pub fn new(metadata: DatasetMetadata, data: Vec<Period>) -> Self {
        Self { metadata, data }
    }

    /// Parses a dataset document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`WordStreamError::Dataset`] when the text is not a valid
    /// dataset document.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wordstream::dataset::Dataset;
    /// let bare = Dataset::from_json(r#"[{"date": "2020", "words": {}}]"#).expect("valid");
    /// assert_eq!(bare.data.len(), 1);
    /// assert!(bare.metadata.dataset_name.is_none());
    /// ```
    pub fn from_json(source: &str) -> Result<Self, WordStreamError> {
        let dataset: Dataset = serde_json::from_str(source)?;
        debug!(periods = dataset.data.len(); "Dataset parsed");
        Ok(dataset)
    }

    /// Reads and parses a dataset document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordStreamError> {
        let path = path.as_ref();
        info!(path:? = path; "Loading dataset");
        let source = fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Serializes the dataset as an envelope document.
    pub fn to_json(&self, pretty: bool) -> Result<String, WordStreamError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_envelope_with_metadata() {
        let json = r#"{
            "metadata": {"dataset_name": "news", "total_periods": 1, "periods": ["2020-01"], "created": "now"},
            "data": [{"date": "2020-01", "words": {"t": [{"text": "a", "frequency": 2, "sudden": 1.5}]}}]
        }"#;
        let dataset = Dataset::from_json(json).expect("valid envelope");

        assert_eq!(dataset.metadata.dataset_name.as_deref(), Some("news"));
        assert_eq!(dataset.metadata.total_periods, Some(1));
        assert_eq!(dataset.metadata.periods, vec!["2020-01"]);
        assert_eq!(dataset.data[0].words_in("t")[0].frequency, 2);
    }

    #[test]
    fn test_envelope_without_metadata() {
        let dataset = Dataset::from_json(r#"{"data": []}"#).expect("valid envelope");
        assert!(dataset.data.is_empty());
        assert_eq!(dataset.metadata, DatasetMetadata::default());
    }

    #[test]
    fn test_invalid_document() {
        let err = Dataset::from_json(r#"{"periods": []}"#).expect_err("not a dataset");
        assert!(matches!(err, WordStreamError::Dataset(_)));
    }

    #[test]
    fn test_float_frequency_loads() {
        let json = r#"[{"date":"1","words":{"t":[{"text":"a","frequency":10.0,"sudden":1}]}}]"#;
        let dataset = Dataset::from_json(json).expect("integral float frequency");
        assert_eq!(dataset.data[0].words_in("t")[0].frequency, 10);
    }

    #[test]
    fn test_field_errors_are_reported() {
        let bare = r#"[{"date":"1","words":{"t":[{"text":"a","frequency":1.5}]}}]"#;
        let err = Dataset::from_json(bare).expect_err("fractional frequency");
        assert!(err.to_string().contains("integral number"), "{err}");

        let envelope = r#"{"data": [{"words": {}}]}"#;
        let err = Dataset::from_json(envelope).expect_err("missing date");
        assert!(err.to_string().contains("`date`"), "{err}");
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = Dataset::from_json("42").expect_err("not a dataset");
        assert!(err.to_string().contains("array of periods"), "{err}");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"date": "1999", "words": {{"x": []}}}}]"#).expect("write");

        let dataset = Dataset::from_path(file.path()).expect("valid file");
        assert_eq!(dataset.data[0].date, "1999");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Dataset::from_path("/nonexistent/wordstream/data.json").expect_err("missing");
        assert!(matches!(err, WordStreamError::Io(_)));
    }

    #[test]
    fn test_to_json_writes_envelope() {
        let dataset = Dataset::new(
            DatasetMetadata {
                dataset_name: Some("demo".to_string()),
                ..DatasetMetadata::default()
            },
            vec![Period::new("2020")],
        );
        let value: serde_json::Value =
            serde_json::from_str(&dataset.to_json(false).expect("serializable")).expect("json");

        assert_eq!(value["metadata"]["dataset_name"], "demo");
        assert_eq!(value["data"][0]["date"], "2020");
        assert!(value["metadata"].get("total_documents").is_none());
    }
}
