//! Social-media text cleaning.
//!
//! Strips links, handles, hashtag markers, and stray symbols so the scorer sees
//! plain prose. Each category is toggled by [`CleaningOptions`].

use std::sync::LazyLock;

use regex::Regex;
use tenor_core::{CleanedText, CleaningOptions, ConfigError};

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z][a-z0-9+.\-]*://\S*|\bwww\.\S*").unwrap());
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
// A run of markers (`###tag`) is one hashtag.
static HASHTAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+(\w+)").unwrap());

/// Validated text normalizer.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    options: CleaningOptions,
}

impl TextNormalizer {
    pub fn new(options: CleaningOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    pub fn normalize(&self, raw_text: &str) -> CleanedText {
        normalize(raw_text, &self.options)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            options: CleaningOptions::default(),
        }
    }
}

/// Clean `raw_text` according to `options`.
///
/// Pure and infallible. Removing one category can expose another (`www$.x`
/// becomes `www.x` once `$` is dropped), so cleaning repeats until the text is
/// stable; the result is therefore a fixed point and normalizing it again is a
/// no-op.
pub fn normalize(raw_text: &str, options: &CleaningOptions) -> CleanedText {
    let mut current = clean_once(raw_text, options);
    // After the first pass every change strictly shortens the text, so this
    // terminates.
    loop {
        let next = clean_once(&current, options);
        if next == current {
            return CleanedText::new(current);
        }
        current = next;
    }
}

fn clean_once(text: &str, options: &CleaningOptions) -> String {
    let mut text = text.to_string();

    if options.strip_urls {
        text = URL_REGEX.replace_all(&text, " ").into_owned();
    }

    if options.strip_mentions {
        text = MENTION_REGEX.replace_all(&text, " ").into_owned();
    }

    if options.strip_hashtag_text {
        text = HASHTAG_REGEX.replace_all(&text, " ").into_owned();
    } else if options.strip_hashtags {
        text = HASHTAG_REGEX.replace_all(&text, "${1}").into_owned();
    }

    text = collapse_whitespace(&text);

    if options.lowercase {
        text = text.to_lowercase();
    }

    if options.strip_punctuation {
        let allow = options.punctuation_allow_list.as_str();
        text.retain(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace() || allow.contains(c));
        text = collapse_whitespace(&text);
    }

    text
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
