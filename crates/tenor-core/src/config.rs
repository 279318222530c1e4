//! Resolved pipeline configuration.
//!
//! These types are plain data: the CLI (or any embedding application) resolves
//! them from files, environment, and flags, then hands them to the pipeline.
//! Nothing in this module touches the filesystem or the environment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// English stop words excluded from word-frequency tables by default.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "didn't", "do", "does", "doesn't", "doing", "don't",
    "down", "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
    "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
    "into", "is", "isn't", "it", "it's", "its", "itself", "just", "me", "more", "most", "my",
    "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "wasn't", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "won't", "would", "you", "your", "yours", "yourself", "yourselves",
];

const fn default_true() -> bool {
    true
}

fn default_allow_list() -> String {
    ".,!?'-".to_string()
}

const fn default_positive() -> f64 {
    0.1
}

const fn default_negative() -> f64 {
    -0.1
}

fn default_stopwords() -> BTreeSet<String> {
    DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect()
}

const fn default_min_word_length() -> usize {
    3
}

const fn default_top_n() -> usize {
    100
}

const fn default_histogram_bins() -> usize {
    50
}

/// Which token categories the normalizer removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// Remove `scheme://...` and bare `www.` tokens.
    #[serde(default = "default_true")]
    pub strip_urls: bool,

    /// Remove `@handle` tokens.
    #[serde(default = "default_true")]
    pub strip_mentions: bool,

    /// Remove the `#` marker of hashtags, keeping the tag text.
    #[serde(default = "default_true")]
    pub strip_hashtags: bool,

    /// Remove whole hashtag tokens instead of only the marker.
    #[serde(default)]
    pub strip_hashtag_text: bool,

    /// Remove characters that are neither alphanumeric, whitespace, nor in the allow-list.
    #[serde(default = "default_true")]
    pub strip_punctuation: bool,

    /// Punctuation kept when `strip_punctuation` is on.
    #[serde(default = "default_allow_list")]
    pub punctuation_allow_list: String,

    #[serde(default = "default_true")]
    pub lowercase: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            strip_urls: true,
            strip_mentions: true,
            strip_hashtags: true,
            strip_hashtag_text: false,
            strip_punctuation: true,
            punctuation_allow_list: default_allow_list(),
            lowercase: true,
        }
    }
}

impl CleaningOptions {
    /// Every removal category enabled, tags removed entirely.
    pub fn strict() -> Self {
        Self {
            strip_hashtag_text: true,
            ..Self::default()
        }
    }

    /// Nothing removed; only whitespace is collapsed.
    pub fn none() -> Self {
        Self {
            strip_urls: false,
            strip_mentions: false,
            strip_hashtags: false,
            strip_hashtag_text: false,
            strip_punctuation: false,
            punctuation_allow_list: String::new(),
            lowercase: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strip_hashtag_text && !self.strip_hashtags {
            return Err(ConfigError::HashtagTextWithoutMarker);
        }
        if let Some(c) = self
            .punctuation_allow_list
            .chars()
            .find(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        {
            return Err(ConfigError::InvalidAllowListChar(c));
        }
        Ok(())
    }
}

/// Polarity cut-offs for classification. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_positive")]
    pub positive: f64,
    #[serde(default = "default_negative")]
    pub negative: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive: default_positive(),
            negative: default_negative(),
        }
    }
}

impl Thresholds {
    /// Build validated thresholds.
    pub fn new(positive: f64, negative: f64) -> Result<Self, ConfigError> {
        let t = Self { positive, negative };
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (positive, negative) = (self.positive, self.negative);
        if !positive.is_finite() || !negative.is_finite() {
            return Err(ConfigError::NonFiniteThreshold { positive, negative });
        }
        if positive < negative {
            return Err(ConfigError::ThresholdOrder { positive, negative });
        }
        if positive < 0.0 || negative > 0.0 {
            return Err(ConfigError::ThresholdSign { positive, negative });
        }
        Ok(())
    }
}

/// Word-frequency extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOptions {
    #[serde(default = "default_stopwords")]
    pub stopwords: BTreeSet<String>,

    /// Tokens shorter than this (in characters) are dropped.
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// How many words reporting collaborators should show per category.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            stopwords: default_stopwords(),
            min_word_length: default_min_word_length(),
            top_n: default_top_n(),
        }
    }
}

/// Fully resolved configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub cleaning: CleaningOptions,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub words: WordOptions,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningOptions::default(),
            thresholds: Thresholds::default(),
            words: WordOptions::default(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cleaning.validate()?;
        self.thresholds.validate()?;
        if self.histogram_bins == 0 {
            return Err(ConfigError::ZeroHistogramBins);
        }
        Ok(())
    }
}
