//! Aggregate statistics over a record sequence.
//!
//! Statistics that have no value for an empty sequence are `Option`s: `None`
//! means "no data", which callers must not confuse with an all-zero sentiment.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::SentimentCategory;

/// Word → occurrence count for one sentiment category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordFrequencies(BTreeMap<String, usize>);

impl WordFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: impl Into<String>) {
        *self.0.entry(word.into()).or_insert(0) += 1;
    }

    pub fn count(&self, word: &str) -> usize {
        self.0.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total occurrences across all words.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// The `n` most frequent words, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut words: Vec<(&str, usize)> = self.iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}

impl<S: Into<String>> FromIterator<S> for WordFrequencies {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = Self::new();
        for word in iter {
            freq.add(word);
        }
        freq
    }
}

/// Equal-width histogram over `[lower, upper]`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Mean polarity of the records falling on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub count: usize,
    pub mean_polarity: f64,
}

/// Summary statistics for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    /// Always holds all three categories.
    pub category_counts: BTreeMap<SentimentCategory, usize>,
    /// Unrounded percentages; all 0.0 when `total == 0`.
    pub category_percentages: BTreeMap<SentimentCategory, f64>,
    pub polarity_mean: Option<f64>,
    pub polarity_median: Option<f64>,
    /// Sample standard deviation (n - 1); 0.0 for a single record.
    pub polarity_stddev: Option<f64>,
    pub subjectivity_mean: Option<f64>,
    pub subjectivity_median: Option<f64>,
    pub positive_words: WordFrequencies,
    pub negative_words: WordFrequencies,
    /// Records whose score is a sentinel because the model failed.
    pub degraded_count: usize,
    pub polarity_histogram: Option<Histogram>,
    pub subjectivity_histogram: Option<Histogram>,
    /// Present only when at least one record carries a timestamp.
    pub time_series: Option<Vec<DailySentiment>>,
}

impl Summary {
    pub fn count(&self, category: SentimentCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn percentage(&self, category: SentimentCategory) -> f64 {
        self.category_percentages
            .get(&category)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn top_words_orders_by_count_then_word() {
        let freq: WordFrequencies = ["love", "great", "love", "amazing", "great", "love"]
            .into_iter()
            .collect();
        assert_eq!(freq.top(2), vec![("love", 3), ("great", 2)]);
        assert_eq!(freq.top(10).len(), 3);
        assert_eq!(freq.total(), 6);
    }

    #[test]
    fn top_words_breaks_ties_alphabetically() {
        let freq: WordFrequencies = ["zeal", "awe", "mild"].into_iter().collect();
        assert_eq!(freq.top(3), vec![("awe", 1), ("mild", 1), ("zeal", 1)]);
    }

    #[test]
    fn missing_word_counts_zero() {
        let freq = WordFrequencies::new();
        assert_eq!(freq.count("nothing"), 0);
        assert!(freq.is_empty());
    }

    #[test]
    fn histogram_bin_width() {
        let h = Histogram {
            lower: -1.0,
            upper: 1.0,
            counts: vec![0; 4],
        };
        assert!((h.bin_width() - 0.5).abs() < 1e-12);
    }
}
