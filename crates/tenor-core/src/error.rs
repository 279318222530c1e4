use thiserror::Error;

/// Invalid pipeline configuration.
///
/// Raised once when a pipeline is constructed, never while items are processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("thresholds must be finite (positive={positive}, negative={negative})")]
    NonFiniteThreshold { positive: f64, negative: f64 },

    #[error("positive threshold {positive} is below negative threshold {negative}")]
    ThresholdOrder { positive: f64, negative: f64 },

    #[error("thresholds must satisfy positive >= 0 >= negative (positive={positive}, negative={negative})")]
    ThresholdSign { positive: f64, negative: f64 },

    #[error("strip_hashtag_text requires strip_hashtags")]
    HashtagTextWithoutMarker,

    #[error("punctuation allow-list may only hold punctuation, found {0:?}")]
    InvalidAllowListChar(char),

    #[error("histogram_bins must be at least 1")]
    ZeroHistogramBins,
}
