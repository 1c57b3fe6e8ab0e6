//! The [`WordStream`] layout facade.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, OnceLock},
};

use indexmap::IndexSet;
use log::{debug, info, trace};

use wordstream_core::{
    geometry::{Bounds, Insets, Point, Size},
    model::{Boxes, Layer, Period, Placement},
    text::TextMeasure,
};

use super::{
    normalize::{self, Domains},
    pack::{PackItem, pack},
    scale::FontScale,
    stack::{self, StackOffset, WeightMetric},
};
use crate::{
    config::{LayoutConfig, TextConfig},
    error::{InvalidWord, LayoutError},
};

/// Configures and runs a streamgraph layout.
///
/// Setters consume and return the engine so calls chain. Queries compute the
/// layout on first use and return the memoized result until the engine is
/// reconfigured.
///
/// # Examples
///
/// ```
/// # use wordstream::layout::WordStream;
/// # use wordstream::model::{Period, Word};
/// let mut period = Period::new("2024-01");
/// period.push_word("news", Word::new("storm", 8, 2.0));
/// period.push_word("news", Word::new("rain", 3, 1.0));
///
/// let engine = WordStream::new()
///     .with_size(600.0, 300.0)
///     .with_data(vec![period]);
///
/// let boxes = engine.boxes().expect("data was set");
/// assert_eq!(boxes.topics, vec!["news"]);
/// assert_eq!(engine.max_freq().expect("data was set"), 8);
/// ```
#[derive(Debug, Clone)]
pub struct WordStream {
    size: Size,
    font_scale: FontScale,
    min_font_size: f32,
    max_font_size: f32,
    weight: WeightMetric,
    offset: StackOffset,
    word_padding: f32,
    topics: Option<Vec<String>>,
    measure: Arc<dyn TextMeasure>,
    data: Option<Vec<Period>>,
    computed: OnceLock<Computed>,
}

#[derive(Debug, Clone)]
struct Computed {
    boxes: Boxes,
    domains: Domains,
    issues: Vec<InvalidWord>,
}

impl Default for WordStream {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default(), &TextConfig::default())
    }
}

impl WordStream {
    /// Creates an engine with default settings and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from configuration sections.
    pub fn from_config(layout: &LayoutConfig, text: &TextConfig) -> Self {
        Self {
            size: Size::new(layout.width(), layout.height()),
            font_scale: layout.font_scale(),
            min_font_size: layout.min_font_size(),
            max_font_size: layout.max_font_size(),
            weight: layout.weight(),
            offset: layout.offset(),
            word_padding: layout.word_padding(),
            topics: layout.topics().map(<[String]>::to_vec),
            measure: text.text_measure(),
            data: None,
            computed: OnceLock::new(),
        }
    }

    /// Sets the canvas size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self.reset()
    }

    /// Sets the frequency to font size mapping.
    pub fn with_font_scale(mut self, font_scale: FontScale) -> Self {
        self.font_scale = font_scale;
        self.reset()
    }

    /// Sets the font size of a zero-frequency word.
    ///
    /// Must be positive and no larger than the maximum font size, or every
    /// query fails with [`LayoutError::Configuration`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use wordstream::LayoutError;
    /// # use wordstream::layout::WordStream;
    /// # use wordstream::model::Period;
    /// let engine = WordStream::new()
    ///     .with_min_font_size(40.0)
    ///     .with_max_font_size(20.0)
    ///     .with_data(vec![Period::new("2024-01")]);
    ///
    /// assert!(matches!(engine.boxes(), Err(LayoutError::Configuration(_))));
    /// ```
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self.reset()
    }

    /// Sets the font size of the most frequent word.
    pub fn with_max_font_size(mut self, size: f32) -> Self {
        self.max_font_size = size;
        self.reset()
    }

    /// Sets the metric that determines band thickness.
    pub fn with_weight(mut self, weight: WeightMetric) -> Self {
        self.weight = weight;
        self.reset()
    }

    /// Sets the stack baseline.
    pub fn with_offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self.reset()
    }

    /// Sets the space kept free on every side of a placed word.
    pub fn with_word_padding(mut self, padding: f32) -> Self {
        self.word_padding = padding;
        self.reset()
    }

    /// Fixes the stacking order. Topics found in the data but missing from
    /// `topics` are stacked after them in first-seen order.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = Some(topics.into_iter().map(Into::into).collect());
        self.reset()
    }

    /// Replaces the footprint measurement strategy.
    pub fn with_text_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self.reset()
    }

    /// Sets the periods to lay out, replacing any previous data.
    pub fn with_data(mut self, data: Vec<Period>) -> Self {
        self.data = Some(data);
        self.reset()
    }

    /// Returns the annotated data, the stacked layers, and the topic order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Configuration`] if no data was set or the
    /// configuration is invalid.
    pub fn boxes(&self) -> Result<&Boxes, LayoutError> {
        self.computed().map(|computed| &computed.boxes)
    }

    /// Smallest suddenness in the data, always positive.
    pub fn min_sud(&self) -> Result<f64, LayoutError> {
        self.computed().map(|computed| computed.domains.min_sud)
    }

    /// Largest suddenness in the data.
    pub fn max_sud(&self) -> Result<f64, LayoutError> {
        self.computed().map(|computed| computed.domains.max_sud)
    }

    /// Largest word frequency in the data.
    pub fn max_freq(&self) -> Result<i64, LayoutError> {
        self.computed().map(|computed| computed.domains.max_freq)
    }

    /// All three scale domains at once.
    pub fn domains(&self) -> Result<Domains, LayoutError> {
        self.computed().map(|computed| computed.domains)
    }

    /// Word records that were repaired before layout.
    pub fn issues(&self) -> Result<&[InvalidWord], LayoutError> {
        self.computed().map(|computed| computed.issues.as_slice())
    }

    fn reset(mut self) -> Self {
        self.computed = OnceLock::new();
        self
    }

    fn computed(&self) -> Result<&Computed, LayoutError> {
        if let Some(computed) = self.computed.get() {
            return Ok(computed);
        }
        let computed = self.compute()?;
        Ok(self.computed.get_or_init(|| computed))
    }

    fn validate(&self) -> Result<&[Period], LayoutError> {
        let data = self.data.as_deref().ok_or_else(|| {
            LayoutError::Configuration("no data set; call `with_data` before querying".to_string())
        })?;

        if !self.size.is_positive() {
            return Err(LayoutError::Configuration(format!(
                "size must be finite and positive, got {}x{}",
                self.size.width(),
                self.size.height()
            )));
        }
        if !self.min_font_size.is_finite()
            || !self.max_font_size.is_finite()
            || self.min_font_size <= 0.0
            || self.min_font_size > self.max_font_size
        {
            return Err(LayoutError::Configuration(format!(
                "font sizes must satisfy 0 < min <= max, got min {} and max {}",
                self.min_font_size, self.max_font_size
            )));
        }
        if !self.word_padding.is_finite() || self.word_padding < 0.0 {
            return Err(LayoutError::Configuration(format!(
                "word padding must be finite and non-negative, got {}",
                self.word_padding
            )));
        }

        Ok(data)
    }

    fn compute(&self) -> Result<Computed, LayoutError> {
        let data = self.validate()?;
        info!(periods = data.len(); "Computing word stream layout");

        let mut periods = data.to_vec();
        let issues = normalize::sanitize(&mut periods);
        let domains = Domains::from_periods(&periods);
        debug!(
            max_freq = domains.max_freq,
            min_sud = domains.min_sud,
            max_sud = domains.max_sud,
            repaired = issues.len();
            "Domains computed"
        );

        let topics = self.resolve_topics(&periods);
        let order: Vec<String> = topics.iter().cloned().collect();
        let totals = stack::topic_totals(&periods, &order, self.weight);
        let layers = stack::stack(&totals, periods.len(), self.offset, self.size);

        let placed = self.place_words(&mut periods, &topics, &layers, domains.max_freq);
        info!(topics = order.len(), placed = placed; "Layout computed");

        Ok(Computed {
            boxes: Boxes {
                data: periods,
                layers,
                topics: order,
            },
            domains,
            issues,
        })
    }

    /// Configured topics first, then unseen categories in first-seen order.
    fn resolve_topics(&self, periods: &[Period]) -> IndexSet<String> {
        let mut topics: IndexSet<String> = self.topics.iter().flatten().cloned().collect();
        for period in periods {
            for topic in period.topics() {
                if !topics.contains(topic) {
                    topics.insert(topic.to_string());
                }
            }
        }
        topics
    }

    /// Packs every (topic, period) cell and attaches a [`Placement`] to each
    /// word. Returns the number of placed words.
    fn place_words(
        &self,
        periods: &mut [Period],
        topics: &IndexSet<String>,
        layers: &[Layer],
        max_freq: i64,
    ) -> usize {
        let slot = self.size.width() / periods.len().max(1) as f32;
        let padding = Insets::uniform(self.word_padding);
        let mut placed_count = 0;
        let mut previous: HashMap<String, HashSet<String>> = HashMap::new();

        for (time_step, period) in periods.iter_mut().enumerate() {
            let mut current: HashMap<String, HashSet<String>> = HashMap::new();

            for (topic, words) in period.words.iter_mut() {
                let Some(point) = topics
                    .get_index_of(topic.as_str())
                    .and_then(|index| layers.get(index))
                    .and_then(|layer| layer.get(time_step + 1))
                else {
                    continue;
                };
                let cell = Bounds::new_from_top_left(
                    Point::new(time_step as f32 * slot, point.y0),
                    Size::new(slot, point.y),
                );

                let font_sizes: Vec<f32> = words
                    .iter()
                    .map(|word| {
                        self.font_scale.font_size(
                            word.frequency,
                            max_freq,
                            self.min_font_size,
                            self.max_font_size,
                        )
                    })
                    .collect();
                let footprints: Vec<Size> = words
                    .iter()
                    .zip(&font_sizes)
                    .map(|(word, &font_size)| self.measure.measure(&word.text, font_size))
                    .collect();
                let items: Vec<PackItem> = words
                    .iter()
                    .zip(&footprints)
                    .map(|(word, footprint)| {
                        PackItem::new(word.frequency as f64, footprint.add_padding(padding))
                    })
                    .collect();

                let packing = pack(cell, &items);
                trace!(
                    time_step = time_step,
                    topic = topic.as_str(),
                    placed = packing.placed.len(),
                    rejected = packing.rejected.len();
                    "Packed cell"
                );

                let mut positions: Vec<Option<Point>> = vec![None; words.len()];
                for (index, bounds) in &packing.placed {
                    positions[*index] = Some(bounds.center());
                }

                let earlier = previous.get(topic);
                let placed_texts = current.entry(topic.clone()).or_default();
                for (index, word) in words.iter_mut().enumerate() {
                    let placed = positions[index].is_some();
                    let center = positions[index].unwrap_or_else(|| cell.center());
                    let cloned = earlier.is_some_and(|texts| texts.contains(&word.text));

                    word.placement = Some(Placement {
                        x: center.x(),
                        y: center.y(),
                        rotate: 0.0,
                        font_size: font_sizes[index],
                        width: footprints[index].width(),
                        height: footprints[index].height(),
                        placed,
                        time_step,
                        cloned,
                    });
                    word.topic = Some(topic.clone());
                    if word.id.is_none() {
                        word.id = Some(format!("{}_{}_{}", word.text, topic, time_step));
                    }

                    if placed {
                        placed_count += 1;
                        placed_texts.insert(word.text.clone());
                    }
                }
            }

            previous = current;
        }

        placed_count
    }
}
