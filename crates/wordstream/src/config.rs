//! Configuration types for WordStream layouts and corpus preprocessing.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML. Every field is optional; missing values fall back to the defaults
//! documented on each getter.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Canvas size, font range, and stacking options.
//! - [`TextConfig`] - How word footprints are measured.
//! - [`CorpusConfig`] - Tokenization options for preprocessing raw documents.
//!
//! # Example
//!
//! ```
//! # use wordstream::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().width(), 1200.0);
//! assert_eq!(config.corpus().min_word_length(), 3);
//! ```

use std::sync::Arc;

use serde::Deserialize;

use wordstream_core::text::{
    DEFAULT_GLYPH_WIDTH, DEFAULT_LINE_HEIGHT, FontMeasure, GlyphEstimate, TextMeasure,
};

use crate::layout::{FontScale, StackOffset, WeightMetric};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Text measurement section.
    #[serde(default)]
    text: TextConfig,

    /// Corpus preprocessing section.
    #[serde(default)]
    corpus: CorpusConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, text: TextConfig, corpus: CorpusConfig) -> Self {
        Self {
            layout,
            text,
            corpus,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the text measurement configuration.
    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    /// Returns the corpus preprocessing configuration.
    pub fn corpus(&self) -> &CorpusConfig {
        &self.corpus
    }
}

/// Canvas and stacking options for the layout engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    width: f32,
    height: f32,
    min_font_size: f32,
    max_font_size: f32,
    font_scale: FontScale,
    weight: WeightMetric,
    offset: StackOffset,
    word_padding: f32,
    topics: Option<Vec<String>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 600.0,
            min_font_size: 10.0,
            max_font_size: 30.0,
            font_scale: FontScale::default(),
            weight: WeightMetric::default(),
            offset: StackOffset::default(),
            word_padding: 1.0,
            topics: None,
        }
    }
}

impl LayoutConfig {
    /// Canvas width in pixels. Defaults to `1200`.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in pixels. Defaults to `600`.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Font size of a zero-frequency word. Defaults to `10`.
    pub fn min_font_size(&self) -> f32 {
        self.min_font_size
    }

    /// Font size of the most frequent word. Defaults to `30`.
    pub fn max_font_size(&self) -> f32 {
        self.max_font_size
    }

    pub fn font_scale(&self) -> FontScale {
        self.font_scale
    }

    pub fn weight(&self) -> WeightMetric {
        self.weight
    }

    pub fn offset(&self) -> StackOffset {
        self.offset
    }

    /// Space kept free around every placed word. Defaults to `1`.
    pub fn word_padding(&self) -> f32 {
        self.word_padding
    }

    /// Fixed stacking order, if configured.
    pub fn topics(&self) -> Option<&[String]> {
        self.topics.as_deref()
    }
}

/// Strategy used to measure word footprints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// [`GlyphEstimate`]: fast and independent of installed fonts.
    #[default]
    Estimate,
    /// [`FontMeasure`]: shapes the text with a system font.
    Font,
}

/// Text measurement options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    measure: MeasureKind,
    glyph_width: f32,
    line_height: f32,
    font_family: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            measure: MeasureKind::default(),
            glyph_width: DEFAULT_GLYPH_WIDTH,
            line_height: DEFAULT_LINE_HEIGHT,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl TextConfig {
    pub fn measure(&self) -> MeasureKind {
        self.measure
    }

    /// Average glyph advance as a fraction of the font size.
    pub fn glyph_width(&self) -> f32 {
        self.glyph_width
    }

    /// Line box height as a fraction of the font size.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Builds the configured [`TextMeasure`].
    pub fn text_measure(&self) -> Arc<dyn TextMeasure> {
        match self.measure {
            MeasureKind::Estimate => Arc::new(GlyphEstimate::new(self.glyph_width, self.line_height)),
            MeasureKind::Font => Arc::new(FontMeasure::new(&self.font_family, self.line_height)),
        }
    }
}

/// Tokenization options for [`corpus`](crate::corpus) preprocessing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    min_word_length: usize,
    extra_stopwords: Vec<String>,
    max_words_per_topic: Option<usize>,
    delimiter: Option<char>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            min_word_length: 3,
            extra_stopwords: Vec::new(),
            max_words_per_topic: None,
            delimiter: None,
        }
    }
}

impl CorpusConfig {
    /// Shortest token kept as a word. Defaults to `3`.
    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Stopwords added to the built-in list.
    pub fn extra_stopwords(&self) -> &[String] {
        &self.extra_stopwords
    }

    /// Keep at most this many words per topic and period.
    pub fn max_words_per_topic(&self) -> Option<usize> {
        self.max_words_per_topic
    }

    /// Field delimiter overriding the one implied by the file extension.
    pub fn delimiter(&self) -> Option<char> {
        self.delimiter
    }

    pub fn with_min_word_length(mut self, min_word_length: usize) -> Self {
        self.min_word_length = min_word_length;
        self
    }

    pub fn with_extra_stopwords(mut self, stopwords: Vec<String>) -> Self {
        self.extra_stopwords = stopwords;
        self
    }

    pub fn with_max_words_per_topic(mut self, max_words: Option<usize>) -> Self {
        self.max_words_per_topic = max_words;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_layout_section_keeps_defaults() {
        let layout: LayoutConfig = serde_json::from_str(
            r#"{"width": 800, "font_scale": "sqrt", "offset": "wiggle", "topics": ["b", "a"]}"#,
        )
        .expect("valid layout config");

        assert_eq!(layout.width(), 800.0);
        assert_eq!(layout.height(), 600.0);
        assert_eq!(layout.font_scale(), FontScale::Sqrt);
        assert_eq!(layout.offset(), StackOffset::Wiggle);
        assert_eq!(layout.weight(), WeightMetric::Frequency);
        assert_eq!(layout.topics(), Some(["b".to_string(), "a".to_string()].as_slice()));
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let result: Result<LayoutConfig, _> = serde_json::from_str(r#"{"weight": "loudness"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_text_measure_estimate() {
        let text: TextConfig =
            serde_json::from_str(r#"{"glyph_width": 0.5, "line_height": 1.0}"#)
                .expect("valid text config");

        let size = text.text_measure().measure("abcd", 10.0);
        assert_eq!(size.width(), 20.0);
        assert_eq!(size.height(), 10.0);
    }

    #[test]
    fn test_corpus_defaults() {
        let corpus = CorpusConfig::default();
        assert_eq!(corpus.min_word_length(), 3);
        assert!(corpus.extra_stopwords().is_empty());
        assert_eq!(corpus.max_words_per_topic(), None);
        assert_eq!(corpus.delimiter(), None);
    }
}
