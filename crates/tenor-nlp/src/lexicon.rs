//! Built-in lexicon sentiment model.
//!
//! Each known word carries a polarity and a subjectivity. Intensifiers scale
//! the next word, negations flip (and damp) words within a short window, and
//! the text's score is the mean over all assessed words.

use std::collections::{HashMap, HashSet};

use tenor_core::SentimentScore;

use crate::scorer::{ModelError, SentimentModel};

/// Polarity multiplier for a negated word.
const NEGATION_FACTOR: f64 = -0.5;

/// Tokens after a negation that it still applies to.
const DEFAULT_NEGATION_WINDOW: usize = 3;

/// (word, polarity, subjectivity)
const ENGLISH_WORDS: &[(&str, f64, f64)] = &[
    // Positive
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("loving", 0.6, 0.95),
    ("lovely", 0.5, 0.75),
    ("like", 0.2, 0.4),
    ("liked", 0.3, 0.5),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("wonderful", 1.0, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("nice", 0.6, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("fun", 0.3, 0.2),
    ("beautiful", 0.85, 1.0),
    ("brilliant", 0.9, 1.0),
    ("cool", 0.35, 0.65),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("exciting", 0.3, 0.8),
    ("excited", 0.375, 0.75),
    ("fine", 0.4167, 0.5),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("outstanding", 0.5, 0.75),
    ("pleasant", 0.7333, 0.9667),
    ("recommend", 0.4, 0.5),
    ("satisfied", 0.5, 1.0),
    ("superb", 1.0, 1.0),
    ("thanks", 0.2, 0.2),
    ("useful", 0.3, 0.0),
    ("helpful", 0.5, 0.5),
    ("win", 0.8, 0.4),
    ("winning", 0.5, 0.75),
    ("success", 0.3, 0.0),
    ("successful", 0.75, 0.95),
    ("fast", 0.2, 0.6),
    ("easy", 0.4333, 0.8333),
    ("fresh", 0.3, 0.5),
    ("clean", 0.3667, 0.6667),
    ("positive", 0.2273, 0.5455),
    ("strong", 0.4333, 0.7333),
    ("favorite", 0.5, 1.0),
    ("favourite", 0.5, 1.0),
    // Negative
    ("bad", -0.7, 0.6667),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("poor", -0.4, 0.6),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("disgusting", -1.0, 1.0),
    ("dreadful", -1.0, 1.0),
    ("fail", -0.5, 0.3),
    ("failed", -0.5, 0.3),
    ("failure", -0.3167, 0.2),
    ("frustrating", -0.4, 0.7),
    ("ugly", -0.7, 1.0),
    ("useless", -0.5, 0.0),
    ("slow", -0.3, 0.3923),
    ("wrong", -0.5, 0.9),
    ("stupid", -0.8, 1.0),
    ("painful", -0.7, 0.9),
    ("problem", -0.2, 0.3),
    ("crash", -0.5, 0.6),
    ("scam", -0.8, 0.8),
    ("expensive", -0.5, 0.7),
    ("negative", -0.3, 0.4),
    ("weak", -0.375, 0.625),
    ("sucks", -0.3, 0.3),
    ("mediocre", -0.3, 0.7),
    ("unhappy", -0.6, 0.9),
    ("dirty", -0.6, 0.8),
    ("difficult", -0.5, 1.0),
    ("hard", -0.2917, 0.5417),
];

/// (word, multiplier) applied to the next word's polarity and subjectivity.
const ENGLISH_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.4),
    ("so", 1.2),
    ("too", 1.2),
    ("totally", 1.3),
    ("absolutely", 1.5),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.6),
    ("barely", 0.4),
];

const ENGLISH_NEGATIONS: &[&str] = &[
    "not", "no", "never", "nor", "neither", "nothing", "nobody", "none", "without", "isn't",
    "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "can't", "cannot", "couldn't",
    "won't", "wouldn't", "shouldn't", "hardly",
];

/// Polarity and subjectivity of a single word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Word lists backing a [`LexiconModel`].
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashMap<String, WordScore>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Lexicon {
    /// A lexicon with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in general-purpose English lexicon.
    pub fn english() -> Self {
        let mut lexicon = Self::empty();
        for &(word, polarity, subjectivity) in ENGLISH_WORDS {
            lexicon.insert(word, polarity, subjectivity);
        }
        for &(word, factor) in ENGLISH_INTENSIFIERS {
            lexicon.insert_intensifier(word, factor);
        }
        for &word in ENGLISH_NEGATIONS {
            lexicon.insert_negation(word);
        }
        lexicon
    }

    /// Add or replace a word; values are clamped into range.
    pub fn insert(&mut self, word: &str, polarity: f64, subjectivity: f64) {
        self.words.insert(
            word.to_lowercase(),
            WordScore {
                polarity: polarity.clamp(-1.0, 1.0),
                subjectivity: subjectivity.clamp(0.0, 1.0),
            },
        );
    }

    pub fn insert_intensifier(&mut self, word: &str, factor: f64) {
        self.intensifiers.insert(word.to_lowercase(), factor);
    }

    pub fn insert_negation(&mut self, word: &str) {
        self.negations.insert(word.to_lowercase());
    }

    pub fn get(&self, word: &str) -> Option<WordScore> {
        self.words.get(word).copied()
    }

    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lexicon-based [`SentimentModel`]. Never fails.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    lexicon: Lexicon,
    negation_window: usize,
}

impl LexiconModel {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            negation_window: DEFAULT_NEGATION_WINDOW,
        }
    }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn assess(&self, text: &str) -> SentimentScore {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut assessed = 0usize;

        let mut intensity = 1.0;
        // Tokens left in the current negation's reach.
        let mut negation_left = 0usize;

        for token in tokens(text) {
            if self.lexicon.is_negation(&token) {
                negation_left = self.negation_window;
                continue;
            }
            if let Some(factor) = self.lexicon.intensifier(&token) {
                intensity *= factor;
                continue;
            }

            if let Some(word) = self.lexicon.get(&token) {
                let mut polarity = word.polarity * intensity;
                if negation_left > 0 {
                    polarity *= NEGATION_FACTOR;
                    negation_left = 0;
                }
                polarity_sum += polarity.clamp(-1.0, 1.0);
                subjectivity_sum += (word.subjectivity * intensity).clamp(0.0, 1.0);
                assessed += 1;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = 1.0;
        }

        if assessed == 0 {
            return SentimentScore::NEUTRAL;
        }
        let n = assessed as f64;
        SentimentScore::new(
            (polarity_sum / n).clamp(-1.0, 1.0),
            (subjectivity_sum / n).clamp(0.0, 1.0),
        )
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new(Lexicon::english())
    }
}

impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn analyze(&self, text: &str) -> Result<SentimentScore, ModelError> {
        Ok(self.assess(text))
    }
}

/// Lowercase word tokens; apostrophes stay inside words ("isn't").
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> SentimentScore {
        LexiconModel::default().analyze(text).unwrap()
    }

    #[test]
    fn positive_text() {
        let s = score("i love this product!");
        assert!((s.polarity - 0.5).abs() < 1e-9);
        assert!((s.subjectivity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn negative_text() {
        let s = score("this is terrible and awful.");
        assert!((s.polarity + 1.0).abs() < 1e-9);
        assert!((s.subjectivity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn factual_text_is_neutral() {
        assert_eq!(score("the meeting is at 3 pm."), SentimentScore::NEUTRAL);
    }

    #[test]
    fn negation_flips_and_damps() {
        let s = score("this is not good");
        assert!((s.polarity - (0.7 * NEGATION_FACTOR)).abs() < 1e-9);
    }

    #[test]
    fn negation_reaches_across_filler_words() {
        let s = score("not a very good idea");
        assert!(s.polarity < 0.0, "got {}", s.polarity);
    }

    #[test]
    fn negation_expires_after_window() {
        let s = score("not one two three four good");
        assert!(s.polarity > 0.0, "got {}", s.polarity);
    }

    #[test]
    fn intensifier_scales_next_word_only() {
        let plain = score("good");
        let boosted = score("very good");
        assert!(boosted.polarity > plain.polarity);
        assert!(boosted.polarity <= 1.0);
        // "very" does not carry past "day".
        let carried = score("very day good");
        assert!((carried.polarity - plain.polarity).abs() < 1e-9);
    }

    #[test]
    fn mixed_text_averages() {
        let s = score("good but bad");
        assert!(s.polarity.abs() < 1e-9);
    }

    #[test]
    fn scores_stay_in_range() {
        for text in [
            "absolutely extremely incredibly awesome",
            "not never terrible worst awful",
            "super super super super best",
            "",
            "'''",
        ] {
            assert!(score(text).in_range(), "{text:?} out of range");
        }
    }

    #[test]
    fn custom_lexicon() {
        let mut lexicon = Lexicon::empty();
        lexicon.insert("Moon", 0.9, 0.8);
        let model = LexiconModel::new(lexicon);
        let s = model.analyze("to the moon").unwrap();
        assert!((s.polarity - 0.9).abs() < 1e-9);
        assert!(model.lexicon().get("moon").is_some());
    }

    #[test]
    fn apostrophe_negations_are_tokens() {
        assert!(score("it isn't great").polarity < 0.0);
        assert!(score("'great'").polarity > 0.0);
    }
}
