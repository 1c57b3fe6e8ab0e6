//! Word extraction from raw document text.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::config::CorpusConfig;

/// English stopwords plus the filler words that dominate news and social
/// media text.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "don", "should", "now", "ain", "aren", "couldn", "didn", "doesn", "hadn", "hasn",
    "haven", "isn", "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won",
    "wouldn", "like", "could", "said", "would", "may", "might", "must", "also", "get", "got",
    "make", "made", "go", "going", "come", "coming", "new", "year", "time", "day", "one",
    "two", "three", "first", "second", "http", "https", "www",
];

/// Splits document text into the distinct words that count towards
/// frequencies.
///
/// # Examples
///
/// ```
/// # use wordstream::config::CorpusConfig;
/// # use wordstream::corpus::Tokenizer;
/// let tokenizer = Tokenizer::new(&CorpusConfig::default());
/// let words = tokenizer.words("Storm hits the COAST. Storm warning: https://x.io/a");
/// assert_eq!(words, vec!["storm", "hits", "coast", "warning"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
    min_word_length: usize,
}

impl Tokenizer {
    pub fn new(config: &CorpusConfig) -> Self {
        let stopwords = STOPWORDS
            .iter()
            .map(|word| word.to_string())
            .chain(config.extra_stopwords().iter().map(|word| word.to_lowercase()))
            .collect();
        Self {
            stopwords,
            min_word_length: config.min_word_length(),
        }
    }

    /// Returns the distinct words of `text` in order of first occurrence.
    ///
    /// A word is a purely alphabetic token of at least the minimum length
    /// that is not a stopword.
    pub fn words(&self, text: &str) -> Vec<String> {
        let cleaned = clean_text(text);
        let mut seen = HashSet::new();
        let mut words = Vec::new();

        for token in cleaned.split_whitespace() {
            let token = token.trim_matches(|c: char| c == '.' || c == '-');
            if token.chars().count() < self.min_word_length
                || !token.chars().all(|c| c.is_ascii_alphabetic())
                || self.stopwords.contains(token)
            {
                continue;
            }
            if seen.insert(token) {
                words.push(token.to_string());
            }
        }

        words
    }
}

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid url pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid tag pattern"));
static SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s\-.]").expect("valid character pattern"));

/// Lowercases `text`, drops URLs and markup tags, and keeps only ASCII
/// letters, digits, whitespace, `-` and `.`.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = URL.replace_all(&lowered, "");
    let without_tags = TAG.replace_all(&without_urls, "");
    let cleaned = SPECIAL.replace_all(&without_tags, "");

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
