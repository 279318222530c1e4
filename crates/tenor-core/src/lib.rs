//! Core types, Arrow schemas, and shared configuration for Tenor.

pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod summary;

pub use config::{CleaningOptions, PipelineConfig, Thresholds, WordOptions};
pub use error::ConfigError;
pub use record::{CleanedText, RawItem, Record, SentimentCategory, SentimentScore};
pub use schema::{record_schema, records_to_batch};
pub use summary::{DailySentiment, Histogram, Summary, WordFrequencies};
