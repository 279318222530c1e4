//! Per-item record building and the end-to-end pipeline.
//!
//! raw item → normalize → score → classify → [`Record`]; the full record
//! sequence is then reduced into a [`Summary`] by the [`Aggregator`].

use tenor_core::{
    CleaningOptions, ConfigError, PipelineConfig, RawItem, Record, SentimentCategory,
    SentimentScore, Summary, Thresholds,
};
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::classifier::Classifier;
use crate::normalizer::TextNormalizer;
use crate::scorer::{Scorer, SentimentModel};

/// Builds one [`Record`] per raw item.
///
/// Holds no mutable state, so items can be built independently and in any order.
#[derive(Debug, Clone)]
pub struct RecordBuilder<M> {
    normalizer: TextNormalizer,
    scorer: Scorer<M>,
    classifier: Classifier,
}

impl<M: SentimentModel> RecordBuilder<M> {
    pub fn new(
        model: M,
        options: CleaningOptions,
        thresholds: Thresholds,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            normalizer: TextNormalizer::new(options)?,
            scorer: Scorer::new(model),
            classifier: Classifier::new(thresholds)?,
        })
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn scorer(&self) -> &Scorer<M> {
        &self.scorer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Build the record for `raw`.
    ///
    /// A scoring failure does not propagate: the record gets the neutral
    /// sentinel score, category Neutral, and `degraded = true`.
    pub fn build(&self, raw: RawItem) -> Record {
        let cleaned_text = self.normalizer.normalize(&raw.text);

        let (score, category, degraded) = match self.scorer.score(&cleaned_text) {
            Ok(score) => (score, self.classifier.classify(score.polarity), false),
            Err(e) => {
                warn!(
                    source_id = raw.source_id.as_deref().unwrap_or("-"),
                    model = self.scorer.model().name(),
                    error = %e,
                    "sentiment scoring failed, recording neutral sentinel"
                );
                (SentimentScore::NEUTRAL, SentimentCategory::Neutral, true)
            }
        };

        Record {
            raw,
            cleaned_text,
            score,
            category,
            degraded,
        }
    }
}

/// Records plus their summary.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<Record>,
    pub summary: Summary,
}

/// The configured normalize → score → classify → aggregate pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline<M> {
    builder: RecordBuilder<M>,
    aggregator: Aggregator,
}

impl<M: SentimentModel> Pipeline<M> {
    /// Validate `config` and assemble the pipeline around `model`.
    ///
    /// This is the only place configuration errors surface.
    pub fn new(config: &PipelineConfig, model: M) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            model = model.name(),
            positive = config.thresholds.positive,
            negative = config.thresholds.negative,
            min_word_length = config.words.min_word_length,
            stopwords = config.words.stopwords.len(),
            "building sentiment pipeline"
        );
        Ok(Self {
            builder: RecordBuilder::new(model, config.cleaning.clone(), config.thresholds)?,
            aggregator: Aggregator::new(config.words.clone(), config.histogram_bins)?,
        })
    }

    pub fn builder(&self) -> &RecordBuilder<M> {
        &self.builder
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Build one record per item, in input order.
    #[cfg(not(feature = "parallel"))]
    pub fn process<I>(&self, items: I) -> Vec<Record>
    where
        I: IntoIterator<Item = RawItem>,
    {
        items
            .into_iter()
            .map(|raw| self.builder.build(raw))
            .collect()
    }

    /// Build one record per item, in input order, across the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn process<I>(&self, items: I) -> Vec<Record>
    where
        I: IntoIterator<Item = RawItem>,
    {
        use rayon::prelude::*;

        let items: Vec<RawItem> = items.into_iter().collect();
        items
            .into_par_iter()
            .map(|raw| self.builder.build(raw))
            .collect()
    }

    pub fn aggregate(&self, records: &[Record]) -> Summary {
        self.aggregator.aggregate(records)
    }

    /// Process every item, then aggregate the complete record sequence.
    pub fn run<I>(&self, items: I) -> PipelineOutput
    where
        I: IntoIterator<Item = RawItem>,
    {
        let records = self.process(items);
        let summary = self.aggregate(&records);
        info!(
            total = summary.total,
            positive = summary.count(SentimentCategory::Positive),
            negative = summary.count(SentimentCategory::Negative),
            neutral = summary.count(SentimentCategory::Neutral),
            degraded = summary.degraded_count,
            "sentiment analysis complete"
        );
        PipelineOutput { records, summary }
    }
}
