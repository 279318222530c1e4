//! Reduction of a record sequence into a [`Summary`].
//!
//! Counts and statistics do not depend on record order. Central tendency uses
//! the arithmetic mean and the textbook median (mean of the two middle values
//! for even lengths); dispersion is the sample standard deviation.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tenor_core::{
    ConfigError, DailySentiment, Histogram, PipelineConfig, Record, SentimentCategory, Summary,
    WordFrequencies, WordOptions,
};
use tracing::debug;

/// Configured summary builder.
#[derive(Debug, Clone)]
pub struct Aggregator {
    stopwords: HashSet<String>,
    min_word_length: usize,
    histogram_bins: usize,
}

impl Aggregator {
    pub fn new(words: WordOptions, histogram_bins: usize) -> Result<Self, ConfigError> {
        if histogram_bins == 0 {
            return Err(ConfigError::ZeroHistogramBins);
        }
        Ok(Self {
            stopwords: words.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            min_word_length: words.min_word_length,
            histogram_bins,
        })
    }

    pub fn aggregate(&self, records: &[Record]) -> Summary {
        let total = records.len();

        let mut category_counts: BTreeMap<SentimentCategory, usize> =
            SentimentCategory::ALL.iter().map(|&c| (c, 0)).collect();
        for record in records {
            *category_counts.entry(record.category).or_insert(0) += 1;
        }

        let category_percentages: BTreeMap<SentimentCategory, f64> = category_counts
            .iter()
            .map(|(&category, &count)| {
                let pct = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                (category, pct)
            })
            .collect();

        let polarity: Vec<f64> = records.iter().map(|r| r.score.polarity).collect();
        let subjectivity: Vec<f64> = records.iter().map(|r| r.score.subjectivity).collect();

        let mut positive_words = WordFrequencies::new();
        let mut negative_words = WordFrequencies::new();
        for record in records {
            let table = match record.category {
                SentimentCategory::Positive => &mut positive_words,
                SentimentCategory::Negative => &mut negative_words,
                SentimentCategory::Neutral => continue,
            };
            for word in self.word_tokens(record.cleaned_text.as_str()) {
                table.add(word);
            }
        }

        let degraded_count = records.iter().filter(|r| r.degraded).count();

        debug!(
            total,
            degraded_count,
            positive_words = positive_words.len(),
            negative_words = negative_words.len(),
            "aggregated records"
        );

        Summary {
            total,
            category_counts,
            category_percentages,
            polarity_mean: mean(&polarity),
            polarity_median: median(&polarity),
            polarity_stddev: sample_stddev(&polarity),
            subjectivity_mean: mean(&subjectivity),
            subjectivity_median: median(&subjectivity),
            positive_words,
            negative_words,
            degraded_count,
            polarity_histogram: histogram(&polarity, -1.0, 1.0, self.histogram_bins),
            subjectivity_histogram: histogram(&subjectivity, 0.0, 1.0, self.histogram_bins),
            time_series: daily_series(records),
        }
    }

    /// Frequency tokens of one cleaned text.
    ///
    /// Lowercased, split on whitespace, stripped of leading/trailing
    /// non-alphanumerics; short tokens and stop words are dropped.
    pub fn word_tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|t| !t.is_empty() && t.chars().count() >= self.min_word_length)
            .filter(|t| !self.stopwords.contains(t))
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        let PipelineConfig {
            words,
            histogram_bins,
            ..
        } = PipelineConfig::default();
        Self {
            stopwords: words.stopwords.into_iter().collect(),
            min_word_length: words.min_word_length,
            histogram_bins,
        }
    }
}

/// Aggregate with default word options.
pub fn aggregate(records: &[Record]) -> Summary {
    Aggregator::default().aggregate(records)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (divides by n - 1); 0.0 for a single value.
fn sample_stddev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let n = values.len();
    if n == 1 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

fn histogram(values: &[f64], lower: f64, upper: f64, bins: usize) -> Option<Histogram> {
    if values.is_empty() {
        return None;
    }
    let width = (upper - lower) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let v = v.clamp(lower, upper);
        let idx = (((v - lower) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram {
        lower,
        upper,
        counts,
    })
}

fn daily_series(records: &[Record]) -> Option<Vec<DailySentiment>> {
    let mut days: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
    for record in records {
        if let Some(ts) = record.timestamp() {
            let day = days.entry(ts.date_naive()).or_insert((0, 0.0));
            day.0 += 1;
            day.1 += record.score.polarity;
        }
    }
    if days.is_empty() {
        return None;
    }
    Some(
        days.into_iter()
            .map(|(date, (count, sum))| DailySentiment {
                date,
                count,
                mean_polarity: sum / count as f64,
            })
            .collect(),
    )
}
