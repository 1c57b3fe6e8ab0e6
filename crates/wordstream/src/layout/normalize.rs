//! Value repair and scale domains.
//!
//! Every word value the later stages read goes through [`clamped_frequency`]
//! and [`clamped_sudden`], so the domains and the stacking agree on what a
//! malformed record counts as.

use log::warn;

use wordstream_core::model::{Period, Word};

use crate::error::{InvalidWord, WordIssue};

/// Smallest suddenness the engine passes on, keeping log scales defined.
pub const SUDDEN_EPSILON: f64 = 1e-6;

/// Global extremes across all words of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domains {
    pub min_sud: f64,
    pub max_sud: f64,
    pub max_freq: i64,
}

impl Default for Domains {
    /// Domains of an empty dataset: a unit suddenness range and no frequency.
    fn default() -> Self {
        Self {
            min_sud: 1.0,
            max_sud: 1.0,
            max_freq: 0,
        }
    }
}

impl Domains {
    /// Computes the domains in a single pass over all words.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wordstream::layout::Domains;
    /// # use wordstream::model::{Period, Word};
    /// let mut period = Period::new("2020");
    /// period.push_word("topic", Word::new("a", 10, 2.0));
    /// period.push_word("topic", Word::new("b", 1, 0.5));
    ///
    /// let domains = Domains::from_periods(&[period]);
    /// assert_eq!(domains.max_freq, 10);
    /// assert_eq!(domains.min_sud, 0.5);
    /// assert_eq!(domains.max_sud, 2.0);
    /// ```
    pub fn from_periods(periods: &[Period]) -> Self {
        let mut words = periods.iter().flat_map(|p| p.all_words()).peekable();
        if words.peek().is_none() {
            return Self::default();
        }

        let mut domains = Self {
            min_sud: f64::INFINITY,
            max_sud: f64::NEG_INFINITY,
            max_freq: 0,
        };
        for word in words {
            let sudden = clamped_sudden(word);
            domains.min_sud = domains.min_sud.min(sudden);
            domains.max_sud = domains.max_sud.max(sudden);
            domains.max_freq = domains.max_freq.max(clamped_frequency(word));
        }
        domains
    }
}

/// Returns the word's frequency with negatives treated as zero.
pub fn clamped_frequency(word: &Word) -> i64 {
    word.frequency.max(0)
}

/// Returns the word's suddenness, replacing non-finite or non-positive values
/// with [`SUDDEN_EPSILON`].
pub fn clamped_sudden(word: &Word) -> f64 {
    if word.sudden.is_finite() && word.sudden > 0.0 {
        word.sudden
    } else {
        SUDDEN_EPSILON
    }
}

/// Writes clamped values back into the periods and reports every repair.
pub(crate) fn sanitize(periods: &mut [Period]) -> Vec<InvalidWord> {
    let mut issues = Vec::new();

    for (time_step, period) in periods.iter_mut().enumerate() {
        for (topic, words) in period.words.iter_mut() {
            for word in words.iter_mut() {
                let mut report = |issue: WordIssue| {
                    let invalid = InvalidWord {
                        time_step,
                        topic: topic.clone(),
                        text: word.text.clone(),
                        issue,
                    };
                    warn!(time_step = time_step, topic = topic.as_str(); "Repaired {invalid}");
                    issues.push(invalid);
                };

                if word.frequency < 0 {
                    report(WordIssue::NegativeFrequency(word.frequency));
                }
                if !word.sudden.is_finite() {
                    report(WordIssue::NonFiniteSudden(word.sudden));
                } else if word.sudden <= 0.0 {
                    report(WordIssue::NonPositiveSudden(word.sudden));
                }

                word.frequency = clamped_frequency(word);
                word.sudden = clamped_sudden(word);
            }
        }
    }

    issues
}
