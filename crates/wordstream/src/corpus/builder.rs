//! Aggregation of raw documents into a dataset.

use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use winnow::{
    Parser as _,
    combinator::{opt, preceded},
    error::ModalResult,
    token::{one_of, take_while},
};

use wordstream_core::model::{Period, Word};

use crate::{
    config::CorpusConfig,
    dataset::{Dataset, DatasetMetadata},
};

use super::{Document, Tokenizer};

/// Topic assigned to documents without a category.
pub const DEFAULT_CATEGORY: &str = "general";

const SENTIMENT_SOURCE: &str = "input";

fn year_month(input: &mut &str) -> ModalResult<(u32, Option<u32>)> {
    let year = take_while(4, |c: char| c.is_ascii_digit()).parse_to::<u32>();
    let month = preceded(
        one_of(['-', '/']),
        take_while(1..=2, |c: char| c.is_ascii_digit())
            .parse_to::<u32>()
            .verify(|month: &u32| (1..=12).contains(month)),
    );
    (year, opt(month)).parse_next(input)
}

/// Buckets a document date into its period label.
///
/// Dates with a month (`2020-03-14`, `2020-3`, `2020/03/14 10:00`) map to
/// `YYYY-MM`; a bare year maps to `YYYY`.
///
/// # Examples
///
/// ```
/// # use wordstream::corpus::period_of;
/// assert_eq!(period_of("2020-03-14T08:00:00Z").as_deref(), Some("2020-03"));
/// assert_eq!(period_of("1999").as_deref(), Some("1999"));
/// assert_eq!(period_of("March 2020"), None);
/// ```
pub fn period_of(date: &str) -> Option<String> {
    let mut input = date.trim();
    let (year, month) = year_month(&mut input).ok()?;
    match month {
        Some(month) if input.is_empty() || input.starts_with(['-', '/', 'T', ' ']) => {
            Some(format!("{year:04}-{month:02}"))
        }
        None if input.is_empty() => Some(format!("{year:04}")),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct WordTally {
    documents: usize,
    categories: IndexMap<String, usize>,
    sentiment_sum: f64,
    sentiment_count: usize,
}

impl WordTally {
    /// The category most of the word's documents belong to; ties go to the
    /// first one seen.
    fn majority_category(&self) -> &str {
        let mut best: Option<(&str, usize)> = None;
        for (category, &count) in &self.categories {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((category, count));
            }
        }
        best.map_or(DEFAULT_CATEGORY, |(category, _)| category)
    }

    fn mean_sentiment(&self) -> Option<f64> {
        (self.sentiment_count > 0).then(|| self.sentiment_sum / self.sentiment_count as f64)
    }
}

/// Turns documents into a [`Dataset`].
///
/// A word's frequency in a period is the number of documents of that period
/// containing it. Its suddenness compares that frequency with the previous
/// period's: `(f + 1) / (f_prev + 1)`.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    tokenizer: Tokenizer,
    max_words_per_topic: Option<usize>,
}

impl Preprocessor {
    pub fn new(config: &CorpusConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
            max_words_per_topic: config.max_words_per_topic(),
        }
    }

    pub fn build(&self, documents: &[Document], dataset_name: Option<&str>) -> Dataset {
        let mut tallies: BTreeMap<String, IndexMap<String, WordTally>> = BTreeMap::new();
        let mut categories: IndexSet<String> = IndexSet::new();
        let mut has_sentiment = false;

        for document in documents {
            let Some(period) = period_of(&document.date) else {
                warn!(date = document.date.as_str(); "Skipping document with unrecognized date");
                continue;
            };
            let category = document
                .category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);
            categories.insert(category.to_string());
            has_sentiment |= document.sentiment.is_some();

            let words = tallies.entry(period).or_default();
            for text in self.tokenizer.words(&document.text) {
                let tally = words.entry(text).or_default();
                tally.documents += 1;
                *tally.categories.entry(category.to_string()).or_insert(0) += 1;
                if let Some(sentiment) = document.sentiment {
                    tally.sentiment_sum += sentiment;
                    tally.sentiment_count += 1;
                }
            }
        }

        let mut unique_words = HashSet::new();
        let mut previous: HashMap<&str, usize> = HashMap::new();
        let mut data = Vec::with_capacity(tallies.len());

        for (date, words) in &tallies {
            let id_suffix = date.replace('-', "_");
            let mut by_topic: HashMap<&str, Vec<Word>> = HashMap::new();

            for (text, tally) in words {
                unique_words.insert(text.as_str());
                let before = previous.get(text.as_str()).copied().unwrap_or(0);
                let topic = tally.majority_category();

                let mut word = Word::new(
                    text.clone(),
                    tally.documents as i64,
                    (tally.documents + 1) as f64 / (before + 1) as f64,
                );
                word.sentiment = tally.mean_sentiment();
                word.topic = Some(topic.to_string());
                word.id = Some(format!("{text}_{id_suffix}"));
                by_topic.entry(topic).or_default().push(word);
            }

            let mut period = Period::new(date.clone());
            for topic in &categories {
                let Some(mut topic_words) = by_topic.remove(topic.as_str()) else {
                    continue;
                };
                topic_words.sort_by(|a, b| {
                    b.frequency
                        .cmp(&a.frequency)
                        .then_with(|| a.text.cmp(&b.text))
                });
                if let Some(limit) = self.max_words_per_topic {
                    topic_words.truncate(limit);
                }
                period.words.insert(topic.clone(), topic_words);
            }
            data.push(period);

            previous = words
                .iter()
                .map(|(text, tally)| (text.as_str(), tally.documents))
                .collect();
        }

        let metadata = DatasetMetadata {
            dataset_name: dataset_name.map(str::to_string),
            total_documents: Some(documents.len()),
            total_periods: Some(data.len()),
            periods: tallies.keys().cloned().collect(),
            categories: categories.into_iter().collect(),
            total_unique_words: Some(unique_words.len()),
            sentiment_model: has_sentiment.then(|| SENTIMENT_SOURCE.to_string()),
        };

        info!(
            documents = documents.len(),
            periods = data.len(),
            unique_words = unique_words.len();
            "Corpus preprocessed"
        );

        Dataset::new(metadata, data)
    }
}
