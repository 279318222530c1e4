//! Sentiment scoring behind a pluggable model.
//!
//! [`SentimentModel`] is the narrow `text → score` capability; any
//! implementation (the built-in [`LexiconModel`](crate::LexiconModel), a remote
//! service client, a trained model) can back a [`Scorer`]. The scorer owns the
//! contract around it: empty text never reaches the model, and whatever the
//! model returns is checked before it enters a record.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tenor_core::{CleanedText, SentimentScore};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("sentiment model failed: {0}")]
    Failed(String),

    #[error("sentiment model returned a non-finite score (polarity={polarity}, subjectivity={subjectivity})")]
    NonFinite { polarity: f64, subjectivity: f64 },

    #[error("sentiment model panicked: {0}")]
    Panicked(String),
}

/// A natural-language sentiment primitive.
///
/// Implementations return polarity in `[-1, 1]` and subjectivity in `[0, 1]`
/// for non-empty text. They are shared across items, so must be `Send + Sync`.
pub trait SentimentModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn analyze(&self, text: &str) -> Result<SentimentScore, ModelError>;
}

impl<M: SentimentModel + ?Sized> SentimentModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn analyze(&self, text: &str) -> Result<SentimentScore, ModelError> {
        (**self).analyze(text)
    }
}

impl<M: SentimentModel + ?Sized> SentimentModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn analyze(&self, text: &str) -> Result<SentimentScore, ModelError> {
        (**self).analyze(text)
    }
}

/// Scores cleaned text with a [`SentimentModel`].
#[derive(Debug, Clone)]
pub struct Scorer<M> {
    model: M,
}

impl<M: SentimentModel> Scorer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Score one cleaned text.
    ///
    /// Empty text short-circuits to [`SentimentScore::NEUTRAL`] without calling
    /// the model. Model errors and panics come back as [`ModelError`]; finite
    /// out-of-range components are clamped into range.
    pub fn score(&self, cleaned_text: &CleanedText) -> Result<SentimentScore, ModelError> {
        if cleaned_text.is_empty() {
            return Ok(SentimentScore::NEUTRAL);
        }

        let text = cleaned_text.as_str();
        let score = panic::catch_unwind(AssertUnwindSafe(|| self.model.analyze(text)))
            .map_err(|payload| ModelError::Panicked(panic_message(payload.as_ref())))??;

        checked(score)
    }
}

fn checked(score: SentimentScore) -> Result<SentimentScore, ModelError> {
    let SentimentScore {
        polarity,
        subjectivity,
    } = score;
    if !polarity.is_finite() || !subjectivity.is_finite() {
        return Err(ModelError::NonFinite {
            polarity,
            subjectivity,
        });
    }
    if !score.in_range() {
        tracing::debug!(polarity, subjectivity, "clamping out-of-range model score");
    }
    Ok(SentimentScore::new(
        polarity.clamp(-1.0, 1.0),
        subjectivity.clamp(0.0, 1.0),
    ))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed score and counts calls.
    struct Fixed {
        score: SentimentScore,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(polarity: f64, subjectivity: f64) -> Self {
            Self {
                score: SentimentScore::new(polarity, subjectivity),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SentimentModel for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn analyze(&self, _text: &str) -> Result<SentimentScore, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.score)
        }
    }

    struct Failing;

    impl SentimentModel for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn analyze(&self, _text: &str) -> Result<SentimentScore, ModelError> {
            Err(ModelError::Failed("backend unavailable".into()))
        }
    }

    struct Panicking;

    impl SentimentModel for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn analyze(&self, _text: &str) -> Result<SentimentScore, ModelError> {
            panic!("lexicon corrupted")
        }
    }

    #[test]
    fn empty_text_skips_model() {
        let scorer = Scorer::new(Fixed::new(0.9, 0.9));
        let score = scorer.score(&CleanedText::default()).unwrap();
        assert_eq!(score, SentimentScore::NEUTRAL);
        assert_eq!(scorer.model().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_empty_text_calls_model_once() {
        let scorer = Scorer::new(Fixed::new(0.4, 0.2));
        let score = scorer.score(&CleanedText::new("fine")).unwrap();
        assert_eq!(score, SentimentScore::new(0.4, 0.2));
        assert_eq!(scorer.model().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let scorer = Scorer::new(Fixed::new(1.5, -0.25));
        let score = scorer.score(&CleanedText::new("wild")).unwrap();
        assert_eq!(score, SentimentScore::new(1.0, 0.0));
    }

    #[test]
    fn nan_score_is_an_error() {
        let scorer = Scorer::new(Fixed::new(f64::NAN, 0.5));
        let err = scorer.score(&CleanedText::new("odd")).unwrap_err();
        assert!(matches!(err, ModelError::NonFinite { .. }));
    }

    #[test]
    fn model_error_is_propagated() {
        let scorer = Scorer::new(Failing);
        let err = scorer.score(&CleanedText::new("hello")).unwrap_err();
        assert_eq!(err, ModelError::Failed("backend unavailable".into()));
    }

    #[test]
    fn model_panic_becomes_error() {
        let scorer = Scorer::new(Panicking);
        let err = scorer.score(&CleanedText::new("hello")).unwrap_err();
        assert_eq!(err, ModelError::Panicked("lexicon corrupted".into()));
    }

    #[test]
    fn boxed_models_delegate() {
        let model: Box<dyn SentimentModel> = Box::new(Fixed::new(-0.3, 0.7));
        let scorer = Scorer::new(model);
        assert_eq!(scorer.model().name(), "fixed");
        let score = scorer.score(&CleanedText::new("meh")).unwrap();
        assert_eq!(score.polarity, -0.3);
    }
}
