//! Threshold classification of polarity into sentiment categories.
//!
//! Bounds are inclusive and checked in order: `polarity >= positive` is
//! Positive, else `polarity <= negative` is Negative, else Neutral. A NaN
//! polarity satisfies neither bound and lands in Neutral.

use tenor_core::{ConfigError, SentimentCategory, Thresholds};

/// Classifier holding validated thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    /// Validate `thresholds` once; classification itself never fails.
    pub fn new(thresholds: Thresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn classify(&self, polarity: f64) -> SentimentCategory {
        classify(polarity, &self.thresholds)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
        }
    }
}

/// Map a polarity onto a category. Assumes `thresholds` is already validated.
pub fn classify(polarity: f64, thresholds: &Thresholds) -> SentimentCategory {
    if polarity >= thresholds.positive {
        SentimentCategory::Positive
    } else if polarity <= thresholds.negative {
        SentimentCategory::Negative
    } else {
        SentimentCategory::Neutral
    }
}
