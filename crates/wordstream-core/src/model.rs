//! Dataset and layout output types.
//!
//! These types are both the input the layout engine consumes and the output it
//! produces: the engine returns the same [`Period`]s with a [`Placement`]
//! attached to every [`Word`], together with the stacked [`Layer`]s.
//!
//! All types serialize with camelCase keys so the JSON matches what streamgraph
//! renderers expect (`fontSize`, `timeStep`, ...).
//!
//! # Examples
//!
//! ```
//! # use wordstream_core::model::{Period, Word};
//! let mut period = Period::new("2024-01");
//! period.push_word("politics", Word::new("election", 12, 2.5));
//! period.push_word("sports", Word::new("final", 4, 1.0));
//!
//! assert_eq!(period.topics().collect::<Vec<_>>(), vec!["politics", "sports"]);
//! assert_eq!(period.words_in("politics").len(), 1);
//! assert!(period.words_in("weather").is_empty());
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Unexpected, Visitor},
};

use crate::geometry::{Bounds, Point, Size};

/// One time bucket of the dataset.
///
/// `words` maps a category (topic) name to its words in insertion order. A
/// topic that is absent from a period contributes nothing to that period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Ordinal label of the period, e.g. `"2024-01"`.
    pub date: String,

    #[serde(default)]
    pub words: IndexMap<String, Vec<Word>>,
}

impl Period {
    /// Creates an empty period with the given date label.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            words: IndexMap::new(),
        }
    }

    /// Appends a word to a topic, creating the topic if needed.
    pub fn push_word(&mut self, topic: &str, word: Word) {
        self.words.entry(topic.to_string()).or_default().push(word);
    }

    /// Returns the topic names of this period in insertion order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Returns the words of `topic`, or an empty slice if the topic is absent.
    pub fn words_in(&self, topic: &str) -> &[Word] {
        self.words.get(topic).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates over every word of every topic.
    pub fn all_words(&self) -> impl Iterator<Item = &Word> {
        self.words.values().flatten()
    }
}

/// A single term within a (period, topic) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,

    /// Mention count. Negative values are clamped to zero by the engine.
    ///
    /// Integral JSON floats such as `10.0` are accepted.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub frequency: i64,

    /// Novelty score. Must be positive wherever a log scale is built from it.
    #[serde(default = "default_sudden")]
    pub sudden: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Owning topic; filled in by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Stable identity across redraws; filled in by the engine when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Layout result, present on words returned by the engine.
    #[serde(flatten)]
    pub placement: Option<Placement>,
}

fn default_sudden() -> f64 {
    1.0
}

struct CountVisitor;

impl Visitor<'_> for CountVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integral number")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        if value.is_finite()
            && value.fract() == 0.0
            && (i64::MIN as f64..=i64::MAX as f64).contains(&value)
        {
            Ok(value as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

impl Word {
    /// Creates a word with the required fields and no optional attributes.
    pub fn new(text: impl Into<String>, frequency: i64, sudden: f64) -> Self {
        Self {
            text: text.into(),
            frequency,
            sudden,
            ..Self::default()
        }
    }

    /// Returns true if the engine placed this word inside its band.
    pub fn is_placed(&self) -> bool {
        self.placement.as_ref().is_some_and(|p| p.placed)
    }
}

/// Derived position and size of a word inside its band cell.
///
/// `x` and `y` are the center of the footprint, so renderers draw the text
/// with centered anchoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub rotate: f32,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,

    /// `false` when the word did not fit; it stays in the data but is hidden.
    pub placed: bool,

    /// Index of the period this word belongs to.
    pub time_step: usize,

    /// `true` when the same text was placed in the same topic one step earlier.
    pub cloned: bool,
}

impl Placement {
    /// Returns the center point of the footprint.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the footprint rectangle.
    pub fn bounds(&self) -> Bounds {
        self.center().to_bounds(Size::new(self.width, self.height))
    }
}

/// One point of a topic band: horizontal position, baseline, and thickness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPoint {
    pub x: f32,
    pub y0: f32,
    pub y: f32,
}

impl LayerPoint {
    pub fn new(x: f32, y0: f32, y: f32) -> Self {
        Self { x, y0, y }
    }

    /// Returns the bottom edge of the band, `y0 + y`.
    pub fn top(&self) -> f32 {
        self.y0 + self.y
    }
}

/// A topic's band across all periods, including the duplicated end points.
pub type Layer = Vec<LayerPoint>;

/// The engine output bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boxes {
    /// Input periods with every word annotated with its [`Placement`].
    pub data: Vec<Period>,

    /// Bands indexed `[topic][point]`; point `0` and the last point are the
    /// duplicated boundaries, point `t + 1` belongs to period `t`.
    pub layers: Vec<Layer>,

    /// Stacking order of the bands.
    pub topics: Vec<String>,
}

impl Boxes {
    /// Returns the band point of `topic_index` at period `time_step`.
    pub fn layer_point(&self, topic_index: usize, time_step: usize) -> Option<&LayerPoint> {
        self.layers.get(topic_index)?.get(time_step + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_deserialize_minimal() {
        let word: Word = serde_json::from_str(r#"{"text":"a","frequency":3,"sudden":2.0}"#)
            .expect("valid word");

        assert_eq!(word.text, "a");
        assert_eq!(word.frequency, 3);
        assert_eq!(word.sudden, 2.0);
        assert!(word.placement.is_none());
        assert!(!word.is_placed());
    }

    #[test]
    fn test_word_deserialize_defaults_missing_fields() {
        let word: Word = serde_json::from_str(r#"{"text":"lonely"}"#).expect("valid word");

        assert_eq!(word.frequency, 0);
        assert_eq!(word.sudden, 1.0);
        assert!(word.topic.is_none());
    }

    #[test]
    fn test_word_frequency_accepts_integral_float() {
        let word: Word = serde_json::from_str(r#"{"text":"a","frequency":10.0}"#)
            .expect("integral float frequency");
        assert_eq!(word.frequency, 10);

        let negative: Word = serde_json::from_str(r#"{"text":"b","frequency":-2.0}"#)
            .expect("negative integral float");
        assert_eq!(negative.frequency, -2);
    }

    #[test]
    fn test_word_frequency_rejects_fraction() {
        let err = serde_json::from_str::<Word>(r#"{"text":"a","frequency":2.5}"#)
            .expect_err("fractional frequency");
        assert!(err.to_string().contains("integral number"));

        assert!(serde_json::from_str::<Word>(r#"{"text":"a","frequency":"3"}"#).is_err());
    }

    #[test]
    fn test_word_serializes_placement_flat() {
        let mut word = Word::new("stream", 7, 1.5);
        word.placement = Some(Placement {
            x: 10.0,
            y: 20.0,
            font_size: 14.0,
            placed: true,
            time_step: 3,
            ..Placement::default()
        });

        let value = serde_json::to_value(&word).expect("serializable");
        assert_eq!(value["fontSize"], 14.0);
        assert_eq!(value["timeStep"], 3);
        assert_eq!(value["placed"], true);
        assert!(value.get("placement").is_none());
        assert!(value.get("sentiment").is_none());
    }

    #[test]
    fn test_word_placement_survives_json() {
        let mut word = Word::new("stream", 7, 1.5);
        word.placement = Some(Placement {
            x: 1.0,
            y: 2.0,
            width: 30.0,
            height: 10.0,
            placed: true,
            ..Placement::default()
        });

        let json = serde_json::to_string(&word).expect("serializable");
        let back: Word = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back.placement, word.placement);
    }

    #[test]
    fn test_period_preserves_topic_order() {
        let json = r#"{"date":"2020","words":{"zeta":[],"alpha":[],"mid":[]}}"#;
        let period: Period = serde_json::from_str(json).expect("valid period");

        assert_eq!(
            period.topics().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_placement_bounds_centered() {
        let placement = Placement {
            x: 50.0,
            y: 40.0,
            width: 20.0,
            height: 10.0,
            ..Placement::default()
        };
        let bounds = placement.bounds();

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.max_y(), 45.0);
    }

    #[test]
    fn test_boxes_layer_point_skips_boundary() {
        let boxes = Boxes {
            data: Vec::new(),
            layers: vec![vec![
                LayerPoint::new(0.0, 1.0, 2.0),
                LayerPoint::new(5.0, 1.0, 2.0),
                LayerPoint::new(10.0, 1.0, 2.0),
            ]],
            topics: vec!["t".to_string()],
        };

        assert_eq!(boxes.layer_point(0, 0).map(|p| p.x), Some(5.0));
        assert!(boxes.layer_point(0, 2).is_none());
        assert!(boxes.layer_point(1, 0).is_none());
    }
}
