//! Sentiment pipeline: text normalization, pluggable scoring, threshold
//! classification, and aggregation into summary statistics.

pub mod aggregate;
pub mod classifier;
pub mod lexicon;
pub mod normalizer;
pub mod pipeline;
pub mod scorer;

pub use aggregate::{Aggregator, aggregate};
pub use classifier::{Classifier, classify};
pub use lexicon::{Lexicon, LexiconModel, WordScore};
pub use normalizer::{TextNormalizer, normalize};
pub use pipeline::{Pipeline, PipelineOutput, RecordBuilder};
pub use scorer::{ModelError, Scorer, SentimentModel};
